//! Agent startup pipeline.

use crate::client::{ConnectError, Connector};
use crate::codec::{CodecError, EncryptionCodec, PayloadConverter};
use crate::config::{AgentConfig, ORCHESTRATOR_PORT};
use crate::log::Logger;
use crate::log_info;
use crate::retry::RetryPolicy;
use crate::runtime::{supervise, ExitOutcome};
use crate::worker::{CatalogError, PoolError, WorkerPool};
use crate::workflow::standard_catalog;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Failures in the startup pipeline. All are fatal.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Payload codec setup failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// No controller could be reached
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Handler catalog construction failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The worker pool did not start
    #[error(transparent)]
    PoolStart(#[from] PoolError),
}

/// The assembled agent: configuration plus the tuning knobs the binary
/// leaves at their defaults.
///
/// `run` executes the strict startup pipeline and then waits out the
/// process lifetime. Stage order is fixed: codec, connection, catalog,
/// pool start, lifecycle wait. Any stage failure aborts the whole run.
pub struct Agent {
    config: AgentConfig,
    port: u16,
    connect_policy: RetryPolicy,
    start_policy: RetryPolicy,
    logger: Arc<dyn Logger>,
}

impl Agent {
    /// Create an agent from validated configuration.
    pub fn new(config: AgentConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            port: ORCHESTRATOR_PORT,
            connect_policy: RetryPolicy::default(),
            start_policy: RetryPolicy::default(),
            logger,
        }
    }

    /// Override the orchestrator port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the connection retry policy.
    pub fn with_connect_policy(mut self, policy: RetryPolicy) -> Self {
        self.connect_policy = policy;
        self
    }

    /// Override the pool start retry policy.
    pub fn with_start_policy(mut self, policy: RetryPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    /// Run the agent until the pool fails or `shutdown` resolves.
    pub async fn run<S>(self, shutdown: S) -> Result<ExitOutcome, AgentError>
    where
        S: Future<Output = ()>,
    {
        let codec = EncryptionCodec::new(self.config.secret.as_bytes())?;
        let converter = Arc::new(PayloadConverter::new(codec));

        let connector = Connector::new(
            self.config.controllers.clone(),
            self.port,
            converter,
            Arc::clone(&self.logger),
        )
        .with_policy(self.connect_policy);
        let client = connector.connect().await?;

        let catalog = standard_catalog(Arc::clone(&self.logger))?;
        let (mut pool, failure) = WorkerPool::new(
            self.config.system_id.clone(),
            self.config.maas_uuid.clone(),
            client,
            catalog,
            Arc::clone(&self.logger),
        );
        pool.start(&self.start_policy).await?;

        log_info!(self.logger, "Service MAAS Agent started");

        let outcome = supervise(failure, shutdown, &self.logger).await;
        if outcome.is_clean() {
            pool.shutdown();
        }

        Ok(outcome)
    }
}
