//! Scan worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled scan worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron triggers are registered. Manual triggers work either way.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound in seconds for each expiry query, parent lookup, and mail send.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            call_timeout_seconds: default_call_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_call_timeout() -> u64 {
    30
}
