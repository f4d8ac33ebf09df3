//! Agent configuration.
//!
//! Configuration is read once at startup from a YAML file and validated
//! before any component is built. There are no defaults for the identity
//! fields and no runtime reloading; a bad file is fatal.
//!
//! File loading lives in [`file`], well-known constants in [`defaults`].

mod defaults;
mod file;

pub use defaults::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_MS,
    DEFAULT_RETRY_MAX_ELAPSED_SECS, ORCHESTRATOR_PORT,
};
pub use file::{config_file_path, AgentConfig, ConfigError};
