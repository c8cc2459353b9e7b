//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docwatch_entity::Category;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Manual trigger acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerResponse {
    /// Confirmation message naming the category.
    pub message: String,
    /// When the run was accepted.
    pub timestamp: DateTime<Utc>,
}

/// Upcoming fire times for a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRunResponse {
    /// Upcoming fire times, soonest first.
    pub next_run_times: Vec<DateTime<Utc>>,
    /// Server time when the query was answered.
    pub current_time: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the document store is unreachable.
    pub status: String,
    /// `connected` or `unreachable`.
    pub database: String,
    /// Application version.
    pub version: String,
    /// Seconds since the API state was built.
    pub uptime_seconds: u64,
    /// Whether the cron scheduler is firing.
    pub scheduler_running: bool,
    /// Per-category job state.
    pub jobs: Vec<JobHealth>,
}

/// Run state of one category job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHealth {
    /// Category.
    pub category: Category,
    /// Stable job key.
    pub job_key: String,
    /// Whether a run is in progress.
    pub running: bool,
}
