//! PostgreSQL connection pool for the document store.
//!
//! DocWatch never writes to the store, so every session is opened
//! read-only.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::Executor;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use docwatch_core::config::DatabaseConfig;
use docwatch_core::error::{AppError, ErrorKind};
use docwatch_core::traits::StoreHealth;

/// Read-only handle on the document store.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connect using the configured pool limits.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            "Connecting to document store"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY")
                        .await?;
                    Ok(())
                })
            })
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to document store: {e}"),
                    e,
                )
            })?;

        info!("Connected to document store");
        Ok(Self { pool })
    }

    /// A clone of the underlying sqlx pool, for handing to a repository.
    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Document store pool closed");
    }
}

#[async_trait]
impl StoreHealth for DatabasePool {
    async fn is_reachable(&self) -> bool {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(v) => v == 1,
            Err(e) => {
                warn!(error = %e, "Document store health check failed");
                false
            }
        }
    }
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    let Some(at_pos) = url[scheme_end..].find('@').map(|p| p + scheme_end) else {
        return url.to_string();
    };
    match url[scheme_end..at_pos].find(':') {
        Some(colon) => {
            let colon_pos = scheme_end + colon;
            format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..])
        }
        None => url.to_string(),
    }
}
