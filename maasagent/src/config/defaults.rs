//! Default values and constants for agent configuration.

// =============================================================================
// Configuration file location
// =============================================================================

/// Default path of the agent configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/maas/agent.yaml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "MAAS_AGENT_CONFIG";

// =============================================================================
// Orchestrator endpoint
// =============================================================================

/// Port the region orchestration service listens on.
pub const ORCHESTRATOR_PORT: u16 = 5271;

// =============================================================================
// Retry budgets
// =============================================================================

/// Base delay before the first retry, in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Upper bound on a single backoff delay, in milliseconds.
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Total elapsed-time budget for a retried operation, in seconds.
pub const DEFAULT_RETRY_MAX_ELAPSED_SECS: u64 = 60;
