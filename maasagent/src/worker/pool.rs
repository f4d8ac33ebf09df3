//! Worker pool: registration, task stream supervision and dispatch.

use crate::client::Client;
use crate::codec::CodecError;
use crate::log::Logger;
use crate::retry::{retry, RetryPolicy};
use crate::worker::{HandlerCatalog, HandlerError, PoolStatus};
use crate::{log_debug, log_error, log_info, log_warn};
use maasagent_proto::{
    Payload, RegisterWorkerRequest, TaskAssignment, TaskKind, TaskOutcome, TaskStreamRequest,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tonic::{Status, Streaming};

/// Worker pool start errors.
#[derive(Debug, Error)]
pub enum PoolError {
    /// `start` was called more than once
    #[error("worker pool already started")]
    AlreadyStarted,

    /// Registration or stream setup failed past the retry budget
    #[error("worker pool start failed: {0}")]
    Start(Status),
}

/// The unrecoverable failure a running pool reports before terminating.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct PoolFailure {
    reason: String,
}

impl PoolFailure {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Human-readable description of what brought the pool down.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors dispatching a single task assignment.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The assignment named a task this agent never registered
    #[error("no handler registered for task '{0}'")]
    NoHandler(String),

    /// Payload encryption or decryption failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The handler reported a failure
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Single-consumption receiver for the pool's failure report.
///
/// The pool sends at most one failure over its lifetime. `recv` consumes
/// the signal, so the failure can only ever be observed once.
pub struct FailureSignal {
    rx: oneshot::Receiver<PoolFailure>,
}

impl FailureSignal {
    pub(crate) fn new(rx: oneshot::Receiver<PoolFailure>) -> Self {
        Self { rx }
    }

    /// Wait for the pool's failure report.
    ///
    /// Returns `None` if the pool went away without failing (orderly
    /// shutdown or dropped before start).
    pub async fn recv(self) -> Option<PoolFailure> {
        self.rx.await.ok()
    }
}

/// Supervises this agent's task processing against the orchestrator.
///
/// Construction is passive; `start` performs registration and opens the
/// task stream under a bounded retry policy, then hands supervision to a
/// background task. Status transitions are published over a watch
/// channel; see [`PoolStatus`] for the state machine.
pub struct WorkerPool {
    system_id: String,
    cluster_uuid: String,
    client: Client,
    catalog: Arc<HandlerCatalog>,
    logger: Arc<dyn Logger>,
    status_tx: Arc<watch::Sender<PoolStatus>>,
    status_rx: watch::Receiver<PoolStatus>,
    failure_tx: Option<oneshot::Sender<PoolFailure>>,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Create a pool in the `Constructed` state.
    ///
    /// Returns the pool together with its failure signal. The signal is
    /// handed out here so there is exactly one receiver per pool.
    pub fn new(
        system_id: impl Into<String>,
        cluster_uuid: impl Into<String>,
        client: Client,
        catalog: HandlerCatalog,
        logger: Arc<dyn Logger>,
    ) -> (Self, FailureSignal) {
        let (status_tx, status_rx) = watch::channel(PoolStatus::Constructed);
        let (failure_tx, failure_rx) = oneshot::channel();

        let pool = Self {
            system_id: system_id.into(),
            cluster_uuid: cluster_uuid.into(),
            client,
            catalog: Arc::new(catalog),
            logger,
            status_tx: Arc::new(status_tx),
            status_rx,
            failure_tx: Some(failure_tx),
            cancel: CancellationToken::new(),
        };

        (pool, FailureSignal::new(failure_rx))
    }

    /// Current pool status.
    pub fn status(&self) -> PoolStatus {
        *self.status_rx.borrow()
    }

    /// Watch receiver observing status transitions.
    pub fn status_watch(&self) -> watch::Receiver<PoolStatus> {
        self.status_rx.clone()
    }

    /// Request orderly teardown of a running pool.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Register with the orchestrator and begin consuming assignments.
    ///
    /// Registration and stream setup are retried under `policy`; if the
    /// budget is exhausted the pool moves to `Failed` and the last
    /// transport error is returned. On success the pool is `Running` and
    /// a background task supervises the stream until failure or
    /// cancellation.
    pub async fn start(&mut self, policy: &RetryPolicy) -> Result<(), PoolError> {
        if self.status() != PoolStatus::Constructed {
            return Err(PoolError::AlreadyStarted);
        }

        self.status_tx.send_replace(PoolStatus::Starting);
        log_info!(
            self.logger,
            "Registering worker {} with orchestrator",
            self.system_id
        );

        let client = self.client.clone();
        let request = RegisterWorkerRequest {
            system_id: self.system_id.clone(),
            cluster_uuid: self.cluster_uuid.clone(),
            workflows: self.catalog.workflow_names(),
            activities: self.catalog.activity_names(),
        };

        let attempt = || {
            let mut orchestrator = client.orchestrator();
            let request = request.clone();
            async move {
                let session_id = orchestrator
                    .register_worker(request)
                    .await?
                    .into_inner()
                    .session_id;
                let stream = orchestrator
                    .task_stream(TaskStreamRequest {
                        session_id: session_id.clone(),
                    })
                    .await?
                    .into_inner();
                Ok::<_, Status>((session_id, stream))
            }
        };

        match retry(policy, attempt).await {
            Ok((session_id, stream)) => {
                let failure_tx = self.failure_tx.take();
                self.status_tx.send_replace(PoolStatus::Running);
                log_info!(
                    self.logger,
                    "Worker pool running with session {}",
                    session_id
                );

                let supervisor = Supervisor {
                    client: self.client.clone(),
                    session_id,
                    catalog: Arc::clone(&self.catalog),
                    logger: Arc::clone(&self.logger),
                    status_tx: Arc::clone(&self.status_tx),
                    failure_tx,
                    cancel: self.cancel.clone(),
                };
                tokio::spawn(supervisor.run(stream));

                Ok(())
            }
            Err(status) => {
                log_error!(self.logger, "Worker pool start failed: {}", status);
                self.status_tx.send_replace(PoolStatus::Failed);
                Err(PoolError::Start(status))
            }
        }
    }
}

/// Background task owning the assignment stream of a running pool.
struct Supervisor {
    client: Client,
    session_id: String,
    catalog: Arc<HandlerCatalog>,
    logger: Arc<dyn Logger>,
    status_tx: Arc<watch::Sender<PoolStatus>>,
    failure_tx: Option<oneshot::Sender<PoolFailure>>,
    cancel: CancellationToken,
}

impl Supervisor {
    async fn run(mut self, mut stream: Streaming<TaskAssignment>) {
        let reason = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    log_info!(self.logger, "Worker pool stopping");
                    self.status_tx.send_replace(PoolStatus::Stopped);
                    return;
                }
                message = stream.message() => match message {
                    Ok(Some(assignment)) => {
                        log_debug!(
                            self.logger,
                            "Task {} assigned: {}",
                            assignment.task_id,
                            assignment.name
                        );
                        self.dispatch(assignment);
                    }
                    Ok(None) => break "task stream closed by server".to_string(),
                    Err(status) => break format!("task stream error: {}", status),
                }
            }
        };

        log_error!(self.logger, "Worker pool failed: {}", reason);
        self.status_tx.send_replace(PoolStatus::Failed);
        if let Some(failure_tx) = self.failure_tx.take() {
            let _ = failure_tx.send(PoolFailure::new(reason));
        }
    }

    /// Run one assignment to completion and report its outcome.
    ///
    /// Assignments run in their own tasks so a slow handler never stalls
    /// the stream.
    fn dispatch(&self, assignment: TaskAssignment) {
        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);
        let logger = Arc::clone(&self.logger);
        let session_id = self.session_id.clone();

        tokio::spawn(async move {
            let task_id = assignment.task_id.clone();
            let name = assignment.name.clone();

            let outcome = match execute(&client, &catalog, assignment).await {
                Ok(result) => TaskOutcome {
                    session_id,
                    task_id: task_id.clone(),
                    result: Some(result),
                    error: String::new(),
                },
                Err(err) => {
                    log_warn!(logger, "Task {} ({}) failed: {}", task_id, name, err);
                    TaskOutcome {
                        session_id,
                        task_id: task_id.clone(),
                        result: None,
                        error: err.to_string(),
                    }
                }
            };

            if let Err(status) = client.orchestrator().complete_task(outcome).await {
                log_warn!(
                    logger,
                    "Failed to report outcome for task {}: {}",
                    task_id,
                    status
                );
            }
        });
    }
}

async fn execute(
    client: &Client,
    catalog: &HandlerCatalog,
    assignment: TaskAssignment,
) -> Result<Payload, DispatchError> {
    let kind = TaskKind::try_from(assignment.kind).unwrap_or(TaskKind::Unspecified);
    let handler = match kind {
        TaskKind::Workflow => catalog.workflow(&assignment.name),
        TaskKind::Activity => catalog.activity(&assignment.name),
        TaskKind::Unspecified => None,
    }
    .ok_or_else(|| DispatchError::NoHandler(assignment.name.clone()))?;

    let input = client
        .converter()
        .from_wire(assignment.input.unwrap_or_default())?;
    let result = handler.call(input).await?;
    let wire = client.converter().to_wire(result)?;

    Ok(wire)
}
