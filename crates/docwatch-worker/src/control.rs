//! Control surface over the scheduled expiry jobs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use docwatch_core::result::AppResult;
use docwatch_entity::Category;

/// Operations the HTTP layer needs from the scheduler.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait JobControl: Send + Sync {
    /// Start a run for `category` now. Returns once the run has been
    /// accepted, with the acceptance time. Fails with `Conflict` while a run
    /// for the category is already in progress.
    async fn trigger_now(&self, category: Category) -> AppResult<DateTime<Utc>>;

    /// Upcoming fire times for the named category. The name is matched
    /// case-insensitively; an unknown name is a `Validation` error.
    async fn next_run_times(&self, category: &str) -> AppResult<Vec<DateTime<Utc>>>;

    /// Whether a run for `category` is in progress.
    fn is_running(&self, category: Category) -> bool;

    /// Whether the cron scheduler has been started.
    fn is_started(&self) -> bool;
}
