//! CLI error handling with user-facing messages.
//!
//! Centralizes error handling for the binary, providing consistent
//! formatting and the exit code contract: any startup failure exits 1.

use maasagent::config::ConfigError;
use maasagent::runtime::AgentError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-facing messages.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded
    Config(ConfigError),
    /// The async runtime could not be built
    Runtime(std::io::Error),
    /// Signal handlers could not be installed
    Signals(std::io::Error),
    /// The startup pipeline failed
    Agent(AgentError),
}

impl CliError {
    /// Log the error and exit the process with status 1.
    pub fn exit(&self) -> ! {
        tracing::error!("{}", self);
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Signals(e) => write!(f, "Failed to install signal handlers: {}", e),
            CliError::Agent(e) => write!(f, "Agent failed to start: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Signals(e) => Some(e),
            CliError::Agent(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<AgentError> for CliError {
    fn from(e: AgentError) -> Self {
        CliError::Agent(e)
    }
}
