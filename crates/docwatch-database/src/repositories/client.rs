//! Client document expiry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use docwatch_core::error::{AppError, ErrorKind};
use docwatch_core::result::AppResult;
use docwatch_core::traits::ExpiryRepository;
use docwatch_entity::{Category, ExpiryCandidate, ParentEntity};

use super::document::{fetch_before, fetch_within_days};

const EXPIRING_WITHIN_DAYS: &str = "\
    SELECT document_id, client_id AS parent_id, document_name, expiry_date \
    FROM client_documents \
    WHERE expiry_date IS NOT NULL \
      AND expiry_date <= NOW() + make_interval(days => $1) \
      AND (is_deleted IS NULL OR is_deleted = FALSE) \
    ORDER BY expiry_date, document_id";

const EXPIRING_BEFORE: &str = "\
    SELECT document_id, client_id AS parent_id, document_name, expiry_date \
    FROM client_documents \
    WHERE expiry_date IS NOT NULL \
      AND expiry_date <= $1 \
      AND (is_deleted IS NULL OR is_deleted = FALSE) \
    ORDER BY expiry_date, document_id";

/// A row of the `clients` table.
#[derive(Debug, FromRow)]
struct ClientRow {
    client_id: Uuid,
    client_name: String,
    mobile: Option<String>,
    email: Option<String>,
}

impl From<ClientRow> for ParentEntity {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.client_id,
            name: row.client_name,
            phone: row.mobile,
            email: row.email,
        }
    }
}

/// Expiring documents attached to client records.
#[derive(Debug, Clone)]
pub struct ClientExpiryRepository {
    pool: PgPool,
}

impl ClientExpiryRepository {
    /// Create a new client expiry repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpiryRepository for ClientExpiryRepository {
    fn category(&self) -> Category {
        Category::Client
    }

    async fn find_expiring_within_days(&self, days: i64) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_within_days(&self.pool, EXPIRING_WITHIN_DAYS, days, Category::Client).await
    }

    async fn find_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_before(&self.pool, EXPIRING_BEFORE, cutoff, Category::Client).await
    }

    async fn find_parent(&self, id: Uuid) -> AppResult<Option<ParentEntity>> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT client_id, client_name, mobile, email FROM clients WHERE client_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find client", e))?;

        Ok(row.map(ParentEntity::from))
    }
}
