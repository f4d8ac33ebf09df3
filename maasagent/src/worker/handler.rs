//! Task handler interface.

use maasagent_proto::Payload;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors a handler can report for a single task.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The task input could not be decoded into the expected parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The handler ran but the task failed
    #[error("task failed: {0}")]
    Failed(String),
}

/// Future returned by a handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Payload, HandlerError>> + Send>>;

/// A named unit of work the orchestrator can assign to this agent.
///
/// Handlers receive the decrypted task input and return the result
/// payload to be encrypted and reported back. Implementations must be
/// `Send + Sync`; the pool invokes them from spawned tasks.
pub trait Handler: Send + Sync {
    /// Run the handler against a task input.
    fn call(&self, input: Payload) -> HandlerFuture;
}
