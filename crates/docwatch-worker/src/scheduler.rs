//! Cron scheduler for the per-category expiry jobs.
//!
//! Each category gets one named job with one daily cron trigger. Overlap is
//! rejected: a scheduled fire that finds its job still running is skipped,
//! and a manual trigger in the same situation fails with `Conflict`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::Instrument;
use uuid::Uuid;

use docwatch_core::error::AppError;
use docwatch_core::result::AppResult;
use docwatch_core::traits::Clock;
use docwatch_entity::{Category, TriggerSource};

use crate::control::JobControl;
use crate::job::ExpiryScanJob;

/// Owns the cron scheduler and the three category jobs.
pub struct ExpiryScheduler {
    scheduler: JobScheduler,
    jobs: HashMap<Category, Arc<ExpiryScanJob>>,
    triggers: HashMap<Category, Uuid>,
    started: AtomicBool,
    clock: Arc<dyn Clock>,
    span: tracing::Span,
}

impl fmt::Debug for ExpiryScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryScheduler")
            .field("jobs", &self.jobs.keys().collect::<Vec<_>>())
            .field("triggers", &self.triggers)
            .field("started", &self.started.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ExpiryScheduler {
    /// Create a scheduler over the given jobs. Nothing fires until
    /// [`register_triggers`](Self::register_triggers) and
    /// [`start`](Self::start) are called.
    pub async fn new(
        jobs: impl IntoIterator<Item = ExpiryScanJob>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        let jobs = jobs
            .into_iter()
            .map(|job| (job.category(), Arc::new(job)))
            .collect();

        Ok(Self {
            scheduler,
            jobs,
            triggers: HashMap::new(),
            started: AtomicBool::new(false),
            clock,
            span: tracing::info_span!("expiry_scheduler"),
        })
    }

    /// The job for a category, if one was supplied.
    pub fn job(&self, category: Category) -> Option<Arc<ExpiryScanJob>> {
        self.jobs.get(&category).cloned()
    }

    /// Register one cron trigger per job.
    pub async fn register_triggers(&mut self) -> AppResult<()> {
        for category in Category::ALL {
            let Some(job) = self.jobs.get(&category).cloned() else {
                continue;
            };
            let id = self.register(job).await?;
            self.triggers.insert(category, id);
        }
        Ok(())
    }

    async fn register(&self, job: Arc<ExpiryScanJob>) -> AppResult<Uuid> {
        let category = job.category();
        let cron = job.schedule().cron.clone();

        let fire = Arc::clone(&job);
        let trigger = CronJob::new_async(cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&fire);
            Box::pin(async move {
                let Some(_permit) = job.try_claim() else {
                    tracing::warn!(
                        category = job.category().as_str(),
                        trigger = job.category().trigger_key(),
                        "Previous run still in progress, skipping scheduled fire"
                    );
                    return;
                };
                job.run(TriggerSource::Scheduled).await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create {} schedule: {e}",
                category.trigger_key()
            ))
        })?;

        let id = self.scheduler.add(trigger).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to add {} schedule: {e}",
                category.trigger_key()
            ))
        })?;

        tracing::info!(
            parent: &self.span,
            job = category.job_key(),
            trigger = category.trigger_key(),
            cron = %cron,
            "Registered: {}",
            category.job_key()
        );
        Ok(id)
    }

    /// Start firing triggers.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        self.started.store(true, Ordering::SeqCst);

        tracing::info!(parent: &self.span, triggers = self.triggers.len(), "Expiry scheduler started");
        Ok(())
    }

    /// Stop firing triggers, then wait up to `grace` for in-flight runs.
    pub async fn shutdown(&self, grace: Duration) -> AppResult<()> {
        async {
            if self.started.swap(false, Ordering::SeqCst) {
                let mut scheduler = self.scheduler.clone();
                scheduler.shutdown().await.map_err(|e| {
                    AppError::internal(format!("Failed to shutdown scheduler: {e}"))
                })?;
            }

            let in_flight: Vec<_> = self.jobs.values().filter(|j| j.is_running()).collect();
            if !in_flight.is_empty() {
                tracing::info!(
                    count = in_flight.len(),
                    "Waiting for in-flight expiry runs to complete"
                );
            }

            let drained = tokio::time::timeout(grace, async {
                for job in self.jobs.values() {
                    job.wait_idle().await;
                }
            })
            .await;

            match drained {
                Ok(()) => tracing::info!("Expiry scheduler shut down"),
                Err(_) => tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Expiry runs still in progress after grace period"
                ),
            }
            Ok::<(), AppError>(())
        }
        .instrument(self.span.clone())
        .await
    }

    fn job_for(&self, category: Category) -> AppResult<&Arc<ExpiryScanJob>> {
        self.jobs.get(&category).ok_or_else(|| {
            AppError::service_unavailable(format!("No job is registered for {category}"))
        })
    }
}

#[async_trait]
impl JobControl for ExpiryScheduler {
    async fn trigger_now(&self, category: Category) -> AppResult<DateTime<Utc>> {
        let job = Arc::clone(self.job_for(category)?);
        let permit = job.try_claim().ok_or_else(|| {
            AppError::conflict(format!(
                "{category} document expiry job is already running"
            ))
        })?;

        let accepted_at = self.clock.now();
        tokio::spawn(async move {
            let _permit = permit;
            job.run(TriggerSource::Manual).await;
        });

        tracing::info!(parent: &self.span, job = category.job_key(), "Manual trigger accepted");
        Ok(accepted_at)
    }

    async fn next_run_times(&self, category: &str) -> AppResult<Vec<DateTime<Utc>>> {
        let category: Category = category.parse()?;
        let Some(id) = self.triggers.get(&category).copied() else {
            return Ok(Vec::new());
        };

        let mut scheduler = self.scheduler.clone();
        let next = scheduler.next_tick_for_job(id).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to read next fire time for {}: {e}",
                category.trigger_key()
            ))
        })?;
        Ok(next.into_iter().collect())
    }

    fn is_running(&self, category: Category) -> bool {
        self.jobs.get(&category).is_some_and(|j| j.is_running())
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::TimeZone;

    use docwatch_core::config::{CategorySchedule, MailConfig, QueryMode};
    use docwatch_core::error::ErrorKind;
    use docwatch_core::traits::{FixedClock, MailMessage, MailSender, MockMailSender};
    use docwatch_database::MemoryExpiryRepository;
    use docwatch_entity::{ExpiryCandidate, ParentEntity};
    use docwatch_service::Notifier;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            sender: "alerts@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
            access_token: String::new(),
            graph_base_url: "http://localhost".to_string(),
            fallback_contact: None,
            signature: "Compliance Team".to_string(),
        }
    }

    fn job(repo: MemoryExpiryRepository, mailer: MockMailSender) -> ExpiryScanJob {
        job_on(repo, Arc::new(mailer), "0 0 11 * * *")
    }

    fn job_on(
        repo: MemoryExpiryRepository,
        mailer: Arc<dyn MailSender>,
        cron: &str,
    ) -> ExpiryScanJob {
        let config = mail_config();
        ExpiryScanJob::new(
            Arc::new(repo),
            Notifier::new(mailer, &config, Duration::from_secs(5)),
            Arc::new(FixedClock(now())),
            CategorySchedule {
                cron: cron.to_string(),
                lookahead_days: 30,
                query_mode: QueryMode::DaysAhead,
            },
            Duration::from_secs(5),
            config.fallback_contact(),
        )
    }

    fn empty_job(category: Category) -> ExpiryScanJob {
        let clock = Arc::new(FixedClock(now()));
        job(
            MemoryExpiryRepository::new(category, clock),
            MockMailSender::new(),
        )
    }

    #[derive(Debug, Default)]
    struct CountingMailer {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl MailSender for CountingMailer {
        async fn send(&self, _message: &MailMessage) -> AppResult<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn one_client_document() -> MemoryExpiryRepository {
        let clock = Arc::new(FixedClock(now()));
        let repo = MemoryExpiryRepository::new(Category::Client, clock);
        let parent_id = Uuid::new_v4();
        repo.insert_parent(ParentEntity {
            id: parent_id,
            name: "Acme Co".to_string(),
            phone: Some("0500000000".to_string()),
            email: None,
        })
        .await;
        repo.insert_document(ExpiryCandidate {
            document_id: Uuid::new_v4(),
            parent_id,
            document_name: "Iqama".to_string(),
            expiry_date: Some(now() + chrono::Duration::days(10)),
            category: Category::Client,
        })
        .await;
        repo
    }

    async fn scheduler(jobs: Vec<ExpiryScanJob>) -> ExpiryScheduler {
        ExpiryScheduler::new(jobs, Arc::new(FixedClock(now())))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_manual_trigger_while_running_conflicts() {
        let sched = scheduler(vec![empty_job(Category::Employee)]).await;
        let job = sched.job(Category::Employee).unwrap();

        let _permit = job.try_claim().unwrap();
        assert!(sched.is_running(Category::Employee));

        let err = sched.trigger_now(Category::Employee).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scheduled_fire_skipped_while_running() {
        let mailer = Arc::new(CountingMailer::default());
        let mut sched = scheduler(vec![job_on(
            one_client_document().await,
            mailer.clone(),
            "* * * * * *",
        )])
        .await;
        sched.register_triggers().await.unwrap();

        let job = sched.job(Category::Client).unwrap();
        let permit = job.try_claim().unwrap();
        sched.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(mailer.sent.load(Ordering::SeqCst), 0);

        drop(permit);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        sched.shutdown(Duration::from_secs(5)).await.unwrap();

        assert!(mailer.sent.load(Ordering::SeqCst) >= 1);
        assert!(!sched.is_running(Category::Client));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_manual_trigger_runs_job() {
        let clock = Arc::new(FixedClock(now()));
        let repo = MemoryExpiryRepository::new(Category::Company, clock);
        let parent_id = Uuid::new_v4();
        repo.insert_parent(ParentEntity {
            id: parent_id,
            name: "DocWatch Holdings".to_string(),
            phone: None,
            email: None,
        })
        .await;
        repo.insert_document(ExpiryCandidate {
            document_id: Uuid::new_v4(),
            parent_id,
            document_name: "Commercial Registration".to_string(),
            expiry_date: Some(now() + chrono::Duration::days(3)),
            category: Category::Company,
        })
        .await;

        let mut mailer = MockMailSender::new();
        mailer
            .expect_send()
            .withf(|m| m.subject == "[Company] Reminder: Commercial Registration Expiring Soon")
            .times(1)
            .returning(|_| Ok(()));

        let sched = scheduler(vec![job(repo, mailer)]).await;
        let accepted = sched.trigger_now(Category::Company).await.unwrap();
        assert_eq!(accepted, now());

        sched.job(Category::Company).unwrap().wait_idle().await;
        assert!(!sched.is_running(Category::Company));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_job_is_unavailable() {
        let sched = scheduler(vec![empty_job(Category::Client)]).await;
        let err = sched.trigger_now(Category::Company).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_next_run_times_rejects_unknown_category() {
        let sched = scheduler(vec![empty_job(Category::Client)]).await;
        let err = sched.next_run_times("bogus").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("bogus"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_next_run_times_without_triggers_is_empty() {
        let sched = scheduler(vec![empty_job(Category::Client)]).await;
        let times = sched.next_run_times("client").await.unwrap();
        assert!(times.is_empty());
        assert!(!sched.is_started());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registered_trigger_reports_future_fire_time() {
        let mut sched = scheduler(vec![
            empty_job(Category::Client),
            empty_job(Category::Employee),
            empty_job(Category::Company),
        ])
        .await;
        sched.register_triggers().await.unwrap();
        assert_eq!(sched.triggers.len(), 3);

        let before = Utc::now();
        let times = sched.next_run_times("CLIENT").await.unwrap();
        assert!(times.len() <= 1);
        assert!(times.iter().all(|t| *t > before));

        sched.shutdown(Duration::from_secs(1)).await.unwrap();
    }
}
