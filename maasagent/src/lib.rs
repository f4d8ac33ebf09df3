//! MAAS Agent - rack controller agent library
//!
//! This library implements the agent process that connects a rack to the
//! MAAS region's orchestration service:
//!
//! - `config`: Agent configuration loading and validation
//! - `codec`: Payload encryption codec (AES-256-GCM)
//! - `retry`: Bounded exponential backoff with jitter
//! - `client`: Resilient orchestrator client connector
//! - `worker`: Worker pool supervisor and handler catalog
//! - `workflow`: The named workflow and activity handlers
//! - `runtime`: Process lifecycle (startup pipeline, signals, exit codes)
//! - `log`: Logging abstraction threaded through components

pub mod client;
pub mod codec;
pub mod config;
pub mod log;
pub mod logging;
pub mod retry;
pub mod runtime;
pub mod worker;
pub mod workflow;

/// Current version of the agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
