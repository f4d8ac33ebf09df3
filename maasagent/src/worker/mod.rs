//! Worker pool supervision.
//!
//! The worker pool registers this agent's handler catalog with the
//! orchestrator, consumes the task assignment stream, and dispatches each
//! assignment to the matching handler. An unrecoverable stream failure is
//! reported exactly once through the pool's [`FailureSignal`]; orderly
//! teardown goes through the cancellation token instead.

mod catalog;
mod handler;
mod pool;
mod status;

pub use catalog::{CatalogError, HandlerCatalog};
pub use handler::{Handler, HandlerError, HandlerFuture};
pub use pool::{DispatchError, FailureSignal, PoolError, PoolFailure, WorkerPool};
pub use status::PoolStatus;
