//! Termination signal handling.

use std::future::Future;
use std::io;

/// Create a future that resolves when the process is asked to stop.
///
/// Listens for SIGINT and SIGTERM on unix. Signal handlers are installed
/// eagerly so installation failure surfaces here rather than at shutdown
/// time; must be called from within a tokio runtime.
#[cfg(unix)]
pub fn termination_listener() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    })
}

/// Create a future that resolves when the process is asked to stop.
///
/// Non-unix fallback listening for ctrl-c.
#[cfg(not(unix))]
pub fn termination_listener() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}
