//! Configuration file handling for /etc/maas/agent.yaml.
//!
//! Loads the agent's YAML configuration and validates it. The path can be
//! overridden with the `MAAS_AGENT_CONFIG` environment variable. Constants
//! live in [`super::defaults`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the config file
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The controllers list is empty
    #[error("no controllers configured")]
    NoControllers,
}

/// Agent configuration as read from the YAML file.
///
/// All four fields are required; missing fields fail the parse. The
/// `controllers` list must name at least one region controller host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfig {
    /// UUID of the MAAS deployment this agent belongs to
    pub maas_uuid: String,
    /// System ID identifying this rack controller
    pub system_id: String,
    /// Shared secret used to derive the payload encryption key
    pub secret: String,
    /// Region controller hosts, in preference order
    pub controllers: Vec<String>,
}

impl AgentConfig {
    /// Load configuration from the resolved path.
    ///
    /// The path comes from `MAAS_AGENT_CONFIG` if set, otherwise
    /// `/etc/maas/agent.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AgentConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.controllers.is_empty() {
            return Err(ConfigError::NoControllers);
        }
        Ok(())
    }
}

/// Get the path to the agent config file.
pub fn config_file_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}
