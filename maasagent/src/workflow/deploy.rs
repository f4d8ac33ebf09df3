//! Deployment and OS lifecycle workflows.

use crate::log::Logger;
use crate::log_info;
use crate::worker::{Handler, HandlerFuture};
use crate::workflow::{decode_params, encode_result, Acknowledgement};
use maasagent_proto::Payload;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DeployParams {
    pub system_id: String,
    #[serde(default)]
    pub osystem: Option<String>,
    #[serde(default)]
    pub distro_series: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OsWorkflowParams {
    pub system_id: String,
}

/// Deploys an operating system to a machine.
pub struct DeployWorkflow {
    logger: Arc<dyn Logger>,
}

impl DeployWorkflow {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for DeployWorkflow {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: DeployParams = decode_params(&input)?;
            log_info!(
                logger,
                "Deploying {} to {}",
                params.osystem.as_deref().unwrap_or("default OS"),
                params.system_id
            );
            encode_result(&Acknowledgement { status: "deployed" })
        })
    }
}

/// Manages a machine running its deployed operating system.
pub struct DeployedOsWorkflow {
    logger: Arc<dyn Logger>,
}

impl DeployedOsWorkflow {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for DeployedOsWorkflow {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: OsWorkflowParams = decode_params(&input)?;
            log_info!(logger, "Supervising deployed OS on {}", params.system_id);
            encode_result(&Acknowledgement { status: "running" })
        })
    }
}

/// Manages a machine booted into the ephemeral environment.
pub struct EphemeralOsWorkflow {
    logger: Arc<dyn Logger>,
}

impl EphemeralOsWorkflow {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for EphemeralOsWorkflow {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: OsWorkflowParams = decode_params(&input)?;
            log_info!(logger, "Supervising ephemeral OS on {}", params.system_id);
            encode_result(&Acknowledgement { status: "running" })
        })
    }
}
