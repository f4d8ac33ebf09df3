//! Logging bootstrap for the agent process.
//!
//! Installs a `tracing` subscriber that writes to stderr. Verbosity is
//! resolved from the `LOG_LEVEL` environment variable; an unrecognized
//! value falls back to `info` with a warning once the subscriber is up.

use std::io;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling the agent's log verbosity.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Initialize the global tracing subscriber.
///
/// Reads `LOG_LEVEL` and installs a stderr subscriber filtered at that
/// level. Unset defaults to `info`. An invalid value also defaults to
/// `info` and emits a warning naming the rejected value.
pub fn init_logging() {
    let (filter, warning) = resolve_filter();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Some(message) = warning {
        tracing::warn!("{}", message);
    }
}

/// Resolve the env filter from `LOG_LEVEL`.
///
/// Returns the filter plus an optional warning to emit once logging is
/// initialized (deferred because nothing can be logged before the
/// subscriber exists).
pub fn resolve_filter() -> (EnvFilter, Option<String>) {
    match std::env::var(LOG_LEVEL_ENV) {
        Ok(value) => match parse_level(&value) {
            Some(level) => (EnvFilter::new(level), None),
            None => (
                EnvFilter::new("info"),
                Some(format!(
                    "Unknown log level '{}', defaulting to 'info'",
                    value
                )),
            ),
        },
        Err(_) => (EnvFilter::new("info"), None),
    }
}

/// Map a `LOG_LEVEL` value to a tracing level directive.
///
/// Accepts the five tracing levels case-insensitively, plus `warning`
/// as an alias for `warn`.
fn parse_level(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}
