//! Generic document expiry scan job.
//!
//! One instance per category. A run queries the category's repository for
//! in-window documents, resolves each owner, and sends one notification per
//! document. Only the initial query can fail a run; every per-document
//! problem is logged, counted, and skipped.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::Instrument;

use docwatch_core::config::{CategorySchedule, QueryMode};
use docwatch_core::error::AppError;
use docwatch_core::result::AppResult;
use docwatch_core::traits::{Clock, ExpiryRepository};
use docwatch_entity::{Category, ExpiryCandidate, NotificationJobRun, ParentEntity, TriggerSource};
use docwatch_service::{ExpiryNotice, Notifier};

use crate::guard::{RunGuard, RunPermit};

const MISSING_PHONE: &str = "N/A";

/// Scan-and-notify job for a single category.
pub struct ExpiryScanJob {
    category: Category,
    repository: Arc<dyn ExpiryRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    schedule: CategorySchedule,
    call_timeout: Duration,
    fallback_contact: String,
    guard: RunGuard,
    span: tracing::Span,
}

impl fmt::Debug for ExpiryScanJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryScanJob")
            .field("category", &self.category)
            .field("schedule", &self.schedule)
            .field("call_timeout", &self.call_timeout)
            .field("running", &self.guard.is_running())
            .finish_non_exhaustive()
    }
}

impl ExpiryScanJob {
    /// Create a job for the repository's category.
    pub fn new(
        repository: Arc<dyn ExpiryRepository>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        schedule: CategorySchedule,
        call_timeout: Duration,
        fallback_contact: impl Into<String>,
    ) -> Self {
        let category = repository.category();
        Self {
            category,
            repository,
            notifier,
            clock,
            schedule,
            call_timeout,
            fallback_contact: fallback_contact.into(),
            guard: RunGuard::new(),
            span: tracing::info_span!(
                "expiry_job",
                category = category.as_str(),
                job = category.job_key()
            ),
        }
    }

    /// The category this job scans.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The schedule this job was built with.
    pub fn schedule(&self) -> &CategorySchedule {
        &self.schedule
    }

    /// Claim the run slot. `None` while another run is in progress.
    pub fn try_claim(&self) -> Option<RunPermit> {
        self.guard.try_claim()
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Wait for an in-progress run, if any, to finish.
    pub async fn wait_idle(&self) {
        self.guard.wait_idle().await;
    }

    /// Claim the run slot and run, or fail with `Conflict` if already running.
    pub async fn run_exclusive(&self, source: TriggerSource) -> AppResult<NotificationJobRun> {
        let _permit = self.try_claim().ok_or_else(|| {
            AppError::conflict(format!(
                "{} document expiry job is already running",
                self.category
            ))
        })?;
        Ok(self.run(source).await)
    }

    /// Execute one scan. Never returns an error: a run-fatal failure is
    /// recorded on the returned run instead.
    ///
    /// Callers that need overlap protection must hold a [`RunPermit`].
    pub async fn run(&self, source: TriggerSource) -> NotificationJobRun {
        let mut run = NotificationJobRun::start(self.category, source, self.clock.now());
        self.execute(&mut run)
            .instrument(self.span.clone())
            .await;
        run
    }

    async fn execute(&self, run: &mut NotificationJobRun) {
        let now = run.started_at;
        tracing::info!(source = %run.source, "Document expiry scan started");

        let found = match self.query(now).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(error = %e, "Expiry query failed, aborting run");
                run.fail(self.clock.now(), e.to_string());
                return;
            }
        };

        let (candidates, untracked): (Vec<_>, Vec<_>) =
            found.into_iter().partition(ExpiryCandidate::is_tracked);
        for doc in &untracked {
            tracing::warn!(
                document_id = %doc.document_id,
                "Repository returned a document without an expiry date, ignoring"
            );
        }

        run.candidates = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        if candidates.is_empty() {
            tracing::info!("No documents expiring within the window");
            run.complete(self.clock.now());
            return;
        }

        tracing::info!(count = candidates.len(), "Found expiring documents");

        for candidate in &candidates {
            self.process(candidate, now, run).await;
        }

        run.complete(self.clock.now());
        tracing::info!(
            candidates = run.candidates,
            attempted = run.attempted,
            delivered = run.delivered,
            skipped = run.skipped,
            failed = run.failed,
            duration_ms = run.duration_ms().unwrap_or_default(),
            "Document expiry scan completed"
        );
    }

    async fn query(&self, now: DateTime<Utc>) -> AppResult<Vec<ExpiryCandidate>> {
        let days = self.schedule.lookahead_days;
        let outcome = match self.schedule.query_mode {
            QueryMode::DaysAhead => {
                timeout(
                    self.call_timeout,
                    self.repository.find_expiring_within_days(days),
                )
                .await
            }
            QueryMode::BeforeDate => {
                let cutoff = chrono::Duration::try_days(days)
                    .and_then(|horizon| now.checked_add_signed(horizon))
                    .ok_or_else(|| {
                        AppError::validation(format!("Lookahead of {days} days is out of range"))
                    })?;
                timeout(self.call_timeout, self.repository.find_expiring_before(cutoff)).await
            }
        };

        outcome.map_err(|_| {
            AppError::timeout(format!(
                "Expiry query did not finish within {}s",
                self.call_timeout.as_secs()
            ))
        })?
    }

    async fn resolve_parent(&self, candidate: &ExpiryCandidate) -> AppResult<Option<ParentEntity>> {
        timeout(self.call_timeout, self.repository.find_parent(candidate.parent_id))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "Parent lookup did not finish within {}s",
                    self.call_timeout.as_secs()
                ))
            })?
    }

    async fn process(
        &self,
        candidate: &ExpiryCandidate,
        now: DateTime<Utc>,
        run: &mut NotificationJobRun,
    ) {
        let parent = match self.resolve_parent(candidate).await {
            Ok(Some(parent)) => parent,
            Ok(None) => {
                tracing::warn!(
                    document_id = %candidate.document_id,
                    parent_id = %candidate.parent_id,
                    "Owner not found, skipping document"
                );
                run.skipped += 1;
                return;
            }
            Err(e) => {
                tracing::error!(
                    document_id = %candidate.document_id,
                    parent_id = %candidate.parent_id,
                    error = %e,
                    "Owner lookup failed"
                );
                run.failed += 1;
                return;
            }
        };

        let notice = self.notice_for(candidate, &parent, now);
        run.attempted += 1;
        match self.notifier.notify(&notice).await {
            Ok(()) => run.delivered += 1,
            Err(e) => {
                tracing::error!(
                    document_id = %candidate.document_id,
                    parent_id = %candidate.parent_id,
                    error = %e,
                    "Expiry notification failed"
                );
                run.failed += 1;
            }
        }
    }

    fn notice_for(
        &self,
        candidate: &ExpiryCandidate,
        parent: &ParentEntity,
        now: DateTime<Utc>,
    ) -> ExpiryNotice {
        ExpiryNotice {
            parent_name: parent.name.clone(),
            document_name: candidate.document_name.clone(),
            phone: parent.contact_phone().unwrap_or(MISSING_PHONE).to_string(),
            expiry_date: candidate.expiry_date.unwrap_or(now),
            is_expired: candidate.is_expired_at(now),
            category: self.category,
            parent_email: parent
                .contact_email()
                .unwrap_or(&self.fallback_contact)
                .to_string(),
        }
    }
}
