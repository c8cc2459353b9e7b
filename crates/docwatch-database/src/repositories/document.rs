//! Document row mapping and window queries shared by the category repositories.
//!
//! Each category's SQL aliases its own columns to `document_id`,
//! `parent_id`, `document_name`, and `expiry_date`, so one row type covers
//! all three tables.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use docwatch_core::error::{AppError, ErrorKind};
use docwatch_core::result::AppResult;
use docwatch_entity::{Category, ExpiryCandidate};

/// One document row as returned by a window query.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct DocumentRow {
    pub document_id: Uuid,
    pub parent_id: Uuid,
    pub document_name: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl DocumentRow {
    fn into_candidate(self, category: Category) -> ExpiryCandidate {
        ExpiryCandidate {
            document_id: self.document_id,
            parent_id: self.parent_id,
            document_name: self.document_name,
            expiry_date: self.expiry_date,
            category,
        }
    }
}

/// Run a window query whose single parameter is a number of days.
pub(crate) async fn fetch_within_days(
    pool: &PgPool,
    sql: &str,
    days: i64,
    category: Category,
) -> AppResult<Vec<ExpiryCandidate>> {
    let days = i32::try_from(days)
        .map_err(|_| AppError::validation(format!("Lookahead of {days} days is out of range")))?;

    let rows = sqlx::query_as::<_, DocumentRow>(sql)
        .bind(days)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to query expiring {} documents", category.as_str()),
                e,
            )
        })?;

    Ok(into_candidates(rows, category))
}

/// Run a window query whose single parameter is an absolute cutoff.
pub(crate) async fn fetch_before(
    pool: &PgPool,
    sql: &str,
    cutoff: DateTime<Utc>,
    category: Category,
) -> AppResult<Vec<ExpiryCandidate>> {
    let rows = sqlx::query_as::<_, DocumentRow>(sql)
        .bind(cutoff)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to query {} documents expiring before {cutoff}", category.as_str()),
                e,
            )
        })?;

    Ok(into_candidates(rows, category))
}

/// Drop rows without an expiry date. The SQL already excludes them, this
/// keeps the port contract even if a view or procedure is swapped in.
fn into_candidates(rows: Vec<DocumentRow>, category: Category) -> Vec<ExpiryCandidate> {
    rows.into_iter()
        .filter(|row| row.expiry_date.is_some())
        .map(|row| row.into_candidate(category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_expiry_rows_are_dropped() {
        let tracked = DocumentRow {
            document_id: Uuid::new_v4(),
            parent_id: Uuid::new_v4(),
            document_name: "Passport".to_string(),
            expiry_date: Some(Utc::now()),
        };
        let untracked = DocumentRow {
            expiry_date: None,
            document_id: Uuid::new_v4(),
            ..tracked.clone()
        };

        let candidates = into_candidates(vec![untracked, tracked.clone()], Category::Employee);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].document_id, tracked.document_id);
        assert_eq!(candidates[0].category, Category::Employee);
    }
}
