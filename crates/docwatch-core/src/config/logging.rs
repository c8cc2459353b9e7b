//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Console log format: `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory for the daily rolling log file. Empty disables file logging.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// File name prefix for the rolling log file.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            directory: default_directory(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_directory() -> String {
    "logs".to_string()
}

fn default_file_prefix() -> String {
    "docwatch.log".to_string()
}
