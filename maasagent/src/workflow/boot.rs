//! Boot order management.

use crate::log::Logger;
use crate::log_info;
use crate::worker::{Handler, HandlerFuture};
use crate::workflow::{decode_params, encode_result, Acknowledgement};
use maasagent_proto::Payload;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SwitchBootOrderParams {
    pub system_id: String,
    #[serde(default)]
    pub network_boot: bool,
}

/// Switches a machine between network and local disk boot.
pub struct SwitchBootOrderActivity {
    logger: Arc<dyn Logger>,
}

impl SwitchBootOrderActivity {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Handler for SwitchBootOrderActivity {
    fn call(&self, input: Payload) -> HandlerFuture {
        let logger = Arc::clone(&self.logger);
        Box::pin(async move {
            let params: SwitchBootOrderParams = decode_params(&input)?;
            let target = if params.network_boot {
                "network"
            } else {
                "local disk"
            };
            log_info!(logger, "Switching {} to {} boot", params.system_id, target);
            encode_result(&Acknowledgement { status: "switched" })
        })
    }
}
