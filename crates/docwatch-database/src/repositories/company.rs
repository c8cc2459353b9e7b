//! Company document expiry repository.
//!
//! Company details live in a loosely named `company_details` table
//! (`company_name`, `mobile_phone`, `primary_email`); they are mapped to
//! [`ParentEntity`] here so the scan never sees those column names.

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
    SELECT document_id, company_id AS parent_id, document_name, expiry_date \
    FROM company_documents \
    WHERE expiry_date IS NOT NULL \
      AND expiry_date <= NOW() + make_interval(days => $1) \
    ORDER BY expiry_date, document_id";

const EXPIRING_BEFORE: &str = "\
    SELECT document_id, company_id AS parent_id, document_name, expiry_date \
    FROM company_documents \
    WHERE expiry_date IS NOT NULL \
      AND expiry_date <= $1 \
    ORDER BY expiry_date, document_id";

/// A row of the `company_details` table.
#[derive(Debug, FromRow)]
struct CompanyRow {
    company_id: Uuid,
    company_name: Option<String>,
    mobile_phone: Option<String>,
    primary_email: Option<String>,
}

impl From<CompanyRow> for ParentEntity {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.company_id,
            name: row
                .company_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Company".to_string()),
            phone: row.mobile_phone,
            email: row.primary_email,
        }
    }
}

/// Expiring documents belonging to the company itself.
#[derive(Debug, Clone)]
pub struct CompanyExpiryRepository {
    pool: PgPool,
}

impl CompanyExpiryRepository {
    /// Create a new company expiry repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpiryRepository for CompanyExpiryRepository {
    fn category(&self) -> Category {
        Category::Company
    }

    async fn find_expiring_within_days(&self, days: i64) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_within_days(&self.pool, EXPIRING_WITHIN_DAYS, days, Category::Company).await
    }

    async fn find_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_before(&self.pool, EXPIRING_BEFORE, cutoff, Category::Company).await
    }

    async fn find_parent(&self, id: Uuid) -> AppResult<Option<ParentEntity>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT company_id, company_name, mobile_phone, primary_email \
             FROM company_details WHERE company_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find company details", e)
        })?;

        Ok(row.map(ParentEntity::from))
    }
}
