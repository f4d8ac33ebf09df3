//! Logging abstraction layer.
//!
//! This module provides a logging interface that decouples agent components
//! from a specific logging backend. Long-lived components never consult
//! global logging state; each receives an explicit logger handle.
//!
//! # Architecture
//!
//! - `Logger` trait: The interface that all components use for logging
//! - `TracingLogger`: Production adapter that delegates to the `tracing` crate
//! - `NoOpLogger`: Silent logger for testing
//!
//! # Usage
//!
//! Components that need logging should accept an `Arc<dyn Logger>` and use
//! the provided macros:
//!
//! ```
//! use maasagent::log::{Logger, LogLevel, NoOpLogger};
//! use maasagent::{log_info, log_debug};
//! use std::sync::Arc;
//!
//! struct Supervisor {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Supervisor {
//!     fn new(logger: Arc<dyn Logger>) -> Self {
//!         Self { logger }
//!     }
//!
//!     fn tick(&self) {
//!         log_info!(self.logger, "Supervisor tick");
//!         log_debug!(self.logger, "Detail only visible at debug level");
//!     }
//! }
//! ```

mod noop;
mod tracing_adapter;
mod r#trait;

pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
