//! The workflows and activities this agent registers.
//!
//! Task names here must match what the region dispatches by. Handlers
//! decode their JSON parameters, act, and return a JSON result payload;
//! the pool takes care of payload encryption on both sides.

mod boot;
mod commission;
mod deploy;
mod power;

pub use boot::SwitchBootOrderActivity;
pub use commission::{CheckIpWorkflow, CommissionWorkflow};
pub use deploy::{DeployWorkflow, DeployedOsWorkflow, EphemeralOsWorkflow};
pub use power::{
    PowerActivity, PowerCycleWorkflow, PowerOffWorkflow, PowerOnWorkflow, PowerQueryWorkflow,
};

use crate::log::Logger;
use crate::worker::{CatalogError, HandlerCatalog, HandlerError};
use maasagent_proto::Payload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Generic completion result for tasks without a richer response.
#[derive(Debug, Serialize)]
pub(crate) struct Acknowledgement {
    pub status: &'static str,
}

pub(crate) fn decode_params<T: DeserializeOwned>(input: &Payload) -> Result<T, HandlerError> {
    serde_json::from_slice(&input.data).map_err(|e| HandlerError::InvalidParameters(e.to_string()))
}

pub(crate) fn encode_result<T: Serialize>(result: &T) -> Result<Payload, HandlerError> {
    let data = serde_json::to_vec(result).map_err(|e| HandlerError::Failed(e.to_string()))?;
    Ok(Payload {
        metadata: HashMap::new(),
        data,
    })
}

/// Build the full catalog of handlers this agent supports.
pub fn standard_catalog(logger: Arc<dyn Logger>) -> Result<HandlerCatalog, CatalogError> {
    let mut catalog = HandlerCatalog::new();

    catalog.register_workflow(
        "check_ip",
        Arc::new(CheckIpWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "commission",
        Arc::new(CommissionWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow("deploy", Arc::new(DeployWorkflow::new(Arc::clone(&logger))))?;
    catalog.register_workflow(
        "deployed_os_workflow",
        Arc::new(DeployedOsWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "ephemeral_os_workflow",
        Arc::new(EphemeralOsWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "power_on",
        Arc::new(PowerOnWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "power_off",
        Arc::new(PowerOffWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "power_query",
        Arc::new(PowerQueryWorkflow::new(Arc::clone(&logger))),
    )?;
    catalog.register_workflow(
        "power_cycle",
        Arc::new(PowerCycleWorkflow::new(Arc::clone(&logger))),
    )?;

    catalog.register_activity(
        "switch_boot_order",
        Arc::new(SwitchBootOrderActivity::new(Arc::clone(&logger))),
    )?;
    catalog.register_activity("power", Arc::new(PowerActivity::new(logger)))?;

    Ok(catalog)
}
