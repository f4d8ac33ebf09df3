//! In-process orchestrator server for integration tests.

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use maasagent::client::{Client, Connector};
use maasagent::codec::{EncryptionCodec, PayloadConverter};
use maasagent::log::NoOpLogger;
use maasagent::retry::{RetryJitter, RetryPolicy};
use maasagent_proto::orchestrator_server::{Orchestrator, OrchestratorServer};
use maasagent_proto::{
    Ack, RegisterWorkerRequest, RegisterWorkerResponse, TaskAssignment, TaskOutcome,
    TaskStreamRequest,
};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::{Request, Response, Status};

/// Scripted orchestrator: fails registration N times, then serves the
/// queued assignments and records completions.
#[derive(Default)]
pub struct TestOrchestrator {
    register_failures: AtomicUsize,
    registrations: Arc<Mutex<Vec<RegisterWorkerRequest>>>,
    assignments: Mutex<Vec<TaskAssignment>>,
    stream_error: Option<Status>,
    hold_open: bool,
    completions: Arc<Mutex<Vec<TaskOutcome>>>,
    held_senders: Mutex<Vec<mpsc::Sender<Result<TaskAssignment, Status>>>>,
}

impl TestOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `count` registration attempts with UNAVAILABLE.
    pub fn with_register_failures(self, count: usize) -> Self {
        self.register_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Queue assignments to deliver on each opened task stream.
    pub fn with_assignments(mut self, assignments: Vec<TaskAssignment>) -> Self {
        self.assignments = Mutex::new(assignments);
        self
    }

    /// End each task stream with an error after the queued assignments.
    pub fn with_stream_error(mut self, status: Status) -> Self {
        self.stream_error = Some(status);
        self
    }

    /// Keep task streams open after the queued assignments.
    pub fn hold_stream_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Registration requests observed so far (including retried ones).
    pub fn registrations(&self) -> Arc<Mutex<Vec<RegisterWorkerRequest>>> {
        Arc::clone(&self.registrations)
    }

    /// Task outcomes reported so far.
    pub fn completions(&self) -> Arc<Mutex<Vec<TaskOutcome>>> {
        Arc::clone(&self.completions)
    }
}

#[tonic::async_trait]
impl Orchestrator for TestOrchestrator {
    async fn register_worker(
        &self,
        request: Request<RegisterWorkerRequest>,
    ) -> Result<Response<RegisterWorkerResponse>, Status> {
        let request = request.into_inner();
        self.registrations.lock().unwrap().push(request.clone());

        let failing = self
            .register_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if failing {
            return Err(Status::unavailable("registration not ready"));
        }

        Ok(Response::new(RegisterWorkerResponse {
            session_id: format!("session-{}", request.system_id),
        }))
    }

    type TaskStreamStream =
        Pin<Box<dyn tokio_stream::Stream<Item = Result<TaskAssignment, Status>> + Send>>;

    async fn task_stream(
        &self,
        _request: Request<TaskStreamRequest>,
    ) -> Result<Response<Self::TaskStreamStream>, Status> {
        let (tx, rx) = mpsc::channel(16);

        let queued: Vec<TaskAssignment> = self.assignments.lock().unwrap().clone();
        for assignment in queued {
            tx.send(Ok(assignment)).await.ok();
        }

        if let Some(status) = self.stream_error.clone() {
            tx.send(Err(status)).await.ok();
        }

        if self.hold_open {
            // Retaining the sender keeps the stream alive
            self.held_senders.lock().unwrap().push(tx);
        }

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn complete_task(&self, request: Request<TaskOutcome>) -> Result<Response<Ack>, Status> {
        self.completions.lock().unwrap().push(request.into_inner());
        Ok(Response::new(Ack {}))
    }
}

/// Serve an orchestrator on an ephemeral loopback port.
pub async fn start_server(orchestrator: TestOrchestrator) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let incoming = TcpListenerStream::new(listener);

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(OrchestratorServer::new(orchestrator))
            .serve_with_incoming(incoming)
            .await
            .ok();
    });

    addr
}

/// A retry policy small enough for tests against live loopback servers.
pub fn quick_policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_base_delay(Duration::from_millis(50))
        .with_max_delay(Duration::from_millis(200))
        .with_max_elapsed(Duration::from_secs(5))
        .with_jitter(RetryJitter::None)
}

/// A policy that exhausts after roughly 150ms of failures.
pub fn tiny_policy() -> RetryPolicy {
    quick_policy().with_max_elapsed(Duration::from_millis(150))
}

pub fn test_converter(secret: &[u8]) -> PayloadConverter {
    PayloadConverter::new(EncryptionCodec::new(secret).unwrap())
}

/// Connect a client to a test server over loopback.
pub async fn connect(addr: SocketAddr, secret: &[u8]) -> Client {
    Connector::new(
        vec!["127.0.0.1".to_string()],
        addr.port(),
        Arc::new(test_converter(secret)),
        Arc::new(NoOpLogger),
    )
    .with_policy(quick_policy())
    .connect()
    .await
    .unwrap()
}
