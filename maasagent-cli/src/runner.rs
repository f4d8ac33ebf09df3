//! Startup sequencing for the maas-agent binary.
//!
//! Order is fixed: logging first so every later failure is reported
//! through the subscriber, then configuration, then the async runtime
//! and the agent pipeline.

use crate::error::CliError;
use maasagent::config::AgentConfig;
use maasagent::log::TracingLogger;
use maasagent::logging;
use maasagent::runtime::{termination_listener, Agent};
use std::path::PathBuf;
use std::sync::Arc;

/// Run the agent to completion, returning the process exit code.
pub fn run(config_path: Option<PathBuf>) -> i32 {
    logging::init_logging();

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => CliError::Runtime(e).exit(),
    };

    runtime.block_on(async {
        // Handlers are installed before the pipeline so a signal during
        // startup is queued rather than killing the process; it is acted
        // on once the lifecycle wait begins.
        let shutdown = match termination_listener() {
            Ok(shutdown) => shutdown,
            Err(e) => CliError::Signals(e).exit(),
        };

        let logger = Arc::new(TracingLogger::new());
        match Agent::new(config, logger).run(shutdown).await {
            Ok(outcome) => outcome.exit_code(),
            Err(e) => CliError::Agent(e).exit(),
        }
    })
}

fn load_config(path: Option<PathBuf>) -> Result<AgentConfig, CliError> {
    let config = match path {
        Some(path) => AgentConfig::load_from(&path)?,
        None => AgentConfig::load()?,
    };
    Ok(config)
}
