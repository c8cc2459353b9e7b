//! DocWatch server: document expiry notification service.
//!
//! Main entry point that wires all crates together and starts the server.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use docwatch_api::{AppState, build_router};
use docwatch_core::config::{AppConfig, LoggingConfig};
use docwatch_core::result::AppResult;
use docwatch_core::traits::{Clock, ExpiryRepository, MailSender, StoreHealth, SystemClock};
use docwatch_database::{
    ClientExpiryRepository, CompanyExpiryRepository, DatabasePool, EmployeeExpiryRepository,
};
use docwatch_entity::{Category, RunStatus, TriggerSource};
use docwatch_service::{GraphMailSender, Notifier};
use docwatch_worker::{ExpiryScanJob, ExpiryScheduler, JobControl};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let guard = init_logging(&config.logging);
    tracing::info!(env = %cli.env, "Configuration loaded");

    let result = match cli.command() {
        Command::Serve => serve(config).await,
        Command::Scan { category } => scan(config, category).await,
    };

    if let Err(e) = result {
        tracing::error!("DocWatch exited with an error: {e:#}");
        drop(guard);
        std::process::exit(1);
    }
}

/// Initialize tracing: console output plus a daily rolling log file.
fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .with(fmt::layer().json().with_writer(file_writer).with_ansi(false))
            .init(),
        _ => registry
            .with(fmt::layer().pretty().with_target(true))
            .with(fmt::layer().with_writer(file_writer).with_ansi(false))
            .init(),
    }

    guard
}

/// Build one scan job per category over the document store.
fn build_jobs(config: &AppConfig, db: &DatabasePool, clock: Arc<dyn Clock>) -> AppResult<Vec<ExpiryScanJob>> {
    let call_timeout = Duration::from_secs(config.worker.call_timeout_seconds);

    let mailer: Arc<dyn MailSender> = Arc::new(GraphMailSender::new(&config.mail, call_timeout)?);
    let notifier = Notifier::new(mailer, &config.mail, call_timeout);

    let repositories: [Arc<dyn ExpiryRepository>; 3] = [
        Arc::new(ClientExpiryRepository::new(db.pool())),
        Arc::new(EmployeeExpiryRepository::new(db.pool())),
        Arc::new(CompanyExpiryRepository::new(db.pool())),
    ];

    Ok(repositories
        .into_iter()
        .map(|repository| {
            let schedule = config.schedule.for_category(repository.category()).clone();
            ExpiryScanJob::new(
                repository,
                notifier.clone(),
                Arc::clone(&clock),
                schedule,
                call_timeout,
                config.mail.fallback_contact(),
            )
        })
        .collect())
}

/// Run the scheduler and HTTP API until a shutdown signal arrives.
async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting DocWatch v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let jobs = build_jobs(&config, &db, Arc::clone(&clock))?;

    let mut scheduler = ExpiryScheduler::new(jobs, clock).await?;
    if config.worker.enabled {
        scheduler.register_triggers().await?;
        scheduler.start().await?;
    } else {
        tracing::info!("Scheduled scans disabled, manual triggers only");
    }
    let scheduler = Arc::new(scheduler);

    let jobs: Arc<dyn JobControl> = scheduler.clone();
    let store: Arc<dyn StoreHealth> = Arc::new(db.clone());
    let app = build_router(AppState::new(jobs, store, config.server.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("DocWatch listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .context("HTTP server error")?;

    scheduler
        .shutdown(Duration::from_secs(config.server.shutdown_grace_seconds))
        .await?;
    db.close().await;

    tracing::info!("DocWatch shut down gracefully");
    Ok(())
}

/// Run one scan immediately and print its summary.
async fn scan(config: AppConfig, category: Category) -> anyhow::Result<()> {
    let db = DatabasePool::connect(&config.database).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let job = build_jobs(&config, &db, clock)?
        .into_iter()
        .find(|job| job.category() == category)
        .with_context(|| format!("No job for category {category}"))?;

    let run = job.run(TriggerSource::Manual).await;
    db.close().await;

    println!("{}", serde_json::to_string_pretty(&run)?);
    if run.status == RunStatus::Failed {
        anyhow::bail!(
            "{category} scan failed: {}",
            run.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
