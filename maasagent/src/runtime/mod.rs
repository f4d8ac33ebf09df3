//! Process runtime: startup pipeline, signal handling and exit outcomes.
//!
//! The agent's startup is a strict pipeline with no partial operation:
//! codec, connection, catalog and pool must all come up or the process
//! exits with an error. Once running, exactly two things can end the
//! process: a pool failure (exit 1) or a termination signal (exit 0).

mod agent;
mod lifecycle;
mod signals;

pub use agent::{Agent, AgentError};
pub use lifecycle::{supervise, ExitOutcome};
pub use signals::termination_listener;
