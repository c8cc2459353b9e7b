//! Notification job run model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::run::status::{RunStatus, TriggerSource};

/// The outcome of one scheduler firing for one category.
///
/// Never persisted: it is logged when the run finishes and returned to
/// whoever started the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJobRun {
    /// Category that was scanned.
    pub category: Category,
    /// What started the run.
    pub source: TriggerSource,
    /// Current status.
    pub status: RunStatus,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Candidates returned by the expiry query.
    pub candidates: u32,
    /// Notifications handed to the notifier.
    pub attempted: u32,
    /// Notifications the mail capability accepted.
    pub delivered: u32,
    /// Candidates skipped because their parent could not be found.
    pub skipped: u32,
    /// Per-candidate failures (parent lookup errors and failed sends).
    pub failed: u32,
    /// Run-fatal error message, if the run failed.
    pub error: Option<String>,
}

impl NotificationJobRun {
    /// Begin a new run.
    pub fn start(category: Category, source: TriggerSource, now: DateTime<Utc>) -> Self {
        Self {
            category,
            source,
            status: RunStatus::Running,
            started_at: now,
            finished_at: None,
            candidates: 0,
            attempted: 0,
            delivered: 0,
            skipped: 0,
            failed: 0,
            error: None,
        }
    }

    /// Total candidates processed. Always equal to the candidates found,
    /// however many individual sends failed.
    pub fn processed(&self) -> u32 {
        self.candidates
    }

    /// Mark the run as completed.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = RunStatus::Completed;
        self.finished_at = Some(now);
    }

    /// Mark the run as failed with a run-fatal error.
    pub fn fail(&mut self, now: DateTime<Utc>, error: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.finished_at = Some(now);
        self.error = Some(error.into());
    }

    /// Wall-clock duration in milliseconds, once finished.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_lifecycle() {
        let start = Utc::now();
        let mut run = NotificationJobRun::start(Category::Company, TriggerSource::Manual, start);
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.duration_ms(), None);

        run.candidates = 3;
        run.failed = 2;
        run.complete(start + Duration::milliseconds(250));

        assert!(run.status.is_terminal());
        assert_eq!(run.processed(), 3);
        assert_eq!(run.duration_ms(), Some(250));
    }

    #[test]
    fn test_fail_records_error() {
        let start = Utc::now();
        let mut run = NotificationJobRun::start(Category::Client, TriggerSource::Scheduled, start);
        run.fail(start, "store unavailable");
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.error.as_deref(), Some("store unavailable"));
    }
}
