//! Expiry repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use docwatch_entity::{Category, ExpiryCandidate, ParentEntity};

use crate::result::AppResult;

/// Read access to one category's expiring documents and their owners.
///
/// One implementation exists per category. Query results must never contain
/// a candidate with a null expiry date, and must be returned in a stable
/// order, which the scan preserves.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ExpiryRepository: Send + Sync {
    /// The category this repository serves.
    fn category(&self) -> Category;

    /// Documents whose expiry is at or before `now + days`.
    async fn find_expiring_within_days(&self, days: i64) -> AppResult<Vec<ExpiryCandidate>>;

    /// Documents whose expiry is at or before `cutoff`.
    async fn find_expiring_before(&self, cutoff: DateTime<Utc>)
    -> AppResult<Vec<ExpiryCandidate>>;

    /// The client, employee, or company with the given id.
    async fn find_parent(&self, id: Uuid) -> AppResult<Option<ParentEntity>>;
}
