//! Power management workflows and the power activity.

use crate::log::Logger;
use crate::log_info;
use crate::worker::{Handler, HandlerFuture};
use crate::workflow::{decode_params, encode_result};
use maasagent_proto::Payload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters shared by the power workflows.
#[derive(Debug, Deserialize)]
pub struct PowerParams {
    pub system_id: String,
    #[serde(default)]
    pub power_type: Option<String>,
}

/// Result reported by power state changes and queries.
#[derive(Debug, Serialize)]
pub struct PowerResult {
    pub state: String,
}

macro_rules! power_workflow {
    ($name:ident, $verb:literal, $state:literal) => {
        pub struct $name {
            logger: Arc<dyn Logger>,
        }

        impl $name {
            pub fn new(logger: Arc<dyn Logger>) -> Self {
                Self { logger }
            }
        }

        impl Handler for $name {
            fn call(&self, input: Payload) -> HandlerFuture {
                let logger = Arc::clone(&self.logger);
                Box::pin(async move {
                    let params: PowerParams = decode_params(&input)?;
                    log_info!(logger, concat!($verb, " {}"), params.system_id);
                    encode_result(&PowerResult {
                        state: $state.to_string(),
                    })
                })
            }
        }
    };
}

power_workflow!(PowerOnWorkflow, "Powering on", "on");
power_workflow!(PowerOffWorkflow, "Powering off", "off");
power_workflow!(PowerQueryWorkflow, "Querying power state of", "on");
power_workflow!(PowerCycleWorkflow, "Power cycling", "on");

/// The raw power activity the power workflows delegate to remotely.
pub struct PowerActivity {
    logger: Arc<dyn Logger>,
}

impl PowerActivity {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for PowerActivity {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: PowerParams = decode_params(&input)?;
            log_info!(logger, "Running power action against {}", params.system_id);
            encode_result(&PowerResult {
                state: "on".to_string(),
            })
        })
    }
}
