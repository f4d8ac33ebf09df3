//! Commissioning workflows.

use crate::log::Logger;
use crate::log_info;
use crate::worker::{Handler, HandlerFuture};
use crate::workflow::{decode_params, encode_result, Acknowledgement};
use maasagent_proto::Payload;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CheckIpParams {
    pub system_id: String,
    #[serde(default)]
    pub ips: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommissionParams {
    pub system_id: String,
    #[serde(default)]
    pub queue: Option<String>,
}

/// Verifies IP address availability for a machine being brought up.
pub struct CheckIpWorkflow {
    logger: Arc<dyn Logger>,
}

impl CheckIpWorkflow {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for CheckIpWorkflow {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: CheckIpParams = decode_params(&input)?;
            log_info!(
                logger,
                "Checking {} addresses for {}",
                params.ips.len(),
                params.system_id
            );
            encode_result(&Acknowledgement { status: "checked" })
        })
    }
}

/// Runs the commissioning sequence against a machine.
pub struct CommissionWorkflow {
    logger: Arc<dyn Logger>,
}

impl CommissionWorkflow {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for CommissionWorkflow {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: CommissionParams = decode_params(&input)?;
            log_info!(logger, "Commissioning {}", params.system_id);
            encode_result(&Acknowledgement {
                status: "commissioned",
            })
        })
    }
}
