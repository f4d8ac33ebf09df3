//! Final lifecycle wait and process exit outcomes.

use crate::log::Logger;
use crate::worker::FailureSignal;
use crate::{log_error, log_info};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// How the agent's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// A termination signal requested orderly shutdown
    Shutdown,
    /// The worker pool failed unrecoverably
    Failure,
}

impl ExitOutcome {
    /// The process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitOutcome::Shutdown => 0,
            ExitOutcome::Failure => 1,
        }
    }

    /// Whether this outcome represents a clean shutdown.
    pub fn is_clean(&self) -> bool {
        matches!(self, ExitOutcome::Shutdown)
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Shutdown => write!(f, "shutdown"),
            ExitOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// Wait for whichever comes first: a pool failure or a shutdown request.
///
/// Exactly one source is ever acted on. If the failure signal wins, the
/// failure is logged and the outcome is `Failure`; if the shutdown
/// future wins, the failure signal is dropped unread and the outcome is
/// `Shutdown`.
pub async fn supervise<S>(
    failure: FailureSignal,
    shutdown: S,
    logger: &Arc<dyn Logger>,
) -> ExitOutcome
where
    S: Future<Output = ()>,
{
    tokio::select! {
        failure = failure.recv() => {
            match failure {
                Some(failure) => log_error!(logger, "Worker pool failure: {}", failure),
                None => log_error!(logger, "Worker pool terminated unexpectedly"),
            }
            ExitOutcome::Failure
        }
        _ = shutdown => {
            log_info!(logger, "Termination signal received, shutting down");
            ExitOutcome::Shutdown
        }
    }
}
