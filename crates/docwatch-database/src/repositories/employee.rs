//! Employee document expiry repository.

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
    SELECT d.document_id, d.emp_id AS parent_id, d.document_name, d.expiry_date \
    FROM employee_documents d \
    WHERE d.expiry_date IS NOT NULL \
      AND d.expiry_date <= NOW() + make_interval(days => $1) \
      AND d.is_deleted = FALSE \
    ORDER BY d.expiry_date, d.document_id";

const EXPIRING_BEFORE: &str = "\
    SELECT d.document_id, d.emp_id AS parent_id, d.document_name, d.expiry_date \
    FROM employee_documents d \
    WHERE d.expiry_date IS NOT NULL \
      AND d.expiry_date <= $1 \
      AND d.is_deleted = FALSE \
    ORDER BY d.expiry_date, d.document_id";

/// A row of the `employees` table.
#[derive(Debug, FromRow)]
struct EmployeeRow {
    emp_id: Uuid,
    full_name: String,
    mobile: Option<String>,
    email: Option<String>,
}

impl From<EmployeeRow> for ParentEntity {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.emp_id,
            name: row.full_name,
            phone: row.mobile,
            email: row.email,
        }
    }
}

/// Expiring documents attached to employee records.
#[derive(Debug, Clone)]
pub struct EmployeeExpiryRepository {
    pool: PgPool,
}

impl EmployeeExpiryRepository {
    /// Create a new employee expiry repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpiryRepository for EmployeeExpiryRepository {
    fn category(&self) -> Category {
        Category::Employee
    }

    async fn find_expiring_within_days(&self, days: i64) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_within_days(&self.pool, EXPIRING_WITHIN_DAYS, days, Category::Employee).await
    }

    async fn find_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiryCandidate>> {
        fetch_before(&self.pool, EXPIRING_BEFORE, cutoff, Category::Employee).await
    }

    async fn find_parent(&self, id: Uuid) -> AppResult<Option<ParentEntity>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT emp_id, full_name, mobile, email FROM employees WHERE emp_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))?;

        Ok(row.map(ParentEntity::from))
    }
}
