//! In-memory expiry repository.
//!
//! Holds documents and parents in process memory and applies the same
//! window rules as the SQL repositories. Test fixture for the scan
//! pipeline; the binary always uses the SQL repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docwatch_core::error::AppError;
use docwatch_core::result::AppResult;
use docwatch_core::traits::{Clock, ExpiryRepository};
use docwatch_entity::{Category, ExpiryCandidate, ParentEntity};

/// In-memory expiry repository for a single category.
///
/// Query results keep insertion order.
#[derive(Debug)]
pub struct MemoryExpiryRepository {
    category: Category,
    clock: Arc<dyn Clock>,
    documents: RwLock<Vec<ExpiryCandidate>>,
    parents: RwLock<HashMap<Uuid, ParentEntity>>,
}

impl MemoryExpiryRepository {
    /// Create an empty repository.
    pub fn new(category: Category, clock: Arc<dyn Clock>) -> Self {
        Self {
            category,
            clock,
            documents: RwLock::new(Vec::new()),
            parents: RwLock::new(HashMap::new()),
        }
    }

    /// Add a document. Its category is overwritten with the repository's.
    pub async fn insert_document(&self, mut document: ExpiryCandidate) {
        document.category = self.category;
        self.documents.write().await.push(document);
    }

    /// Add or replace a parent entity.
    pub async fn insert_parent(&self, parent: ParentEntity) {
        self.parents.write().await.insert(parent.id, parent);
    }

    async fn due_by(&self, cutoff: DateTime<Utc>) -> Vec<ExpiryCandidate> {
        self.documents
            .read()
            .await
            .iter()
            .filter(|doc| doc.is_due_by(cutoff))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExpiryRepository for MemoryExpiryRepository {
    fn category(&self) -> Category {
        self.category
    }

    async fn find_expiring_within_days(&self, days: i64) -> AppResult<Vec<ExpiryCandidate>> {
        let horizon = Duration::try_days(days)
            .ok_or_else(|| AppError::validation(format!("Lookahead of {days} days is out of range")))?;
        Ok(self.due_by(self.clock.now() + horizon).await)
    }

    async fn find_expiring_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiryCandidate>> {
        Ok(self.due_by(cutoff).await)
    }

    async fn find_parent(&self, id: Uuid) -> AppResult<Option<ParentEntity>> {
        Ok(self.parents.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use docwatch_core::traits::FixedClock;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn document(name: &str, expiry: Option<DateTime<Utc>>) -> ExpiryCandidate {
        ExpiryCandidate {
            document_id: Uuid::new_v4(),
            parent_id: Uuid::new_v4(),
            document_name: name.to_string(),
            expiry_date: expiry,
            category: Category::Company,
        }
    }

    async fn seeded() -> MemoryExpiryRepository {
        let repo = MemoryExpiryRepository::new(Category::Client, Arc::new(FixedClock(now())));
        repo.insert_document(document("Iqama", Some(now() + Duration::days(10))))
            .await;
        repo.insert_document(document("Untracked", None)).await;
        repo.insert_document(document("Expired", Some(now() - Duration::days(1))))
            .await;
        repo.insert_document(document("Far", Some(now() + Duration::days(90))))
            .await;
        repo
    }

    #[tokio::test]
    async fn test_within_days_excludes_null_and_out_of_window() {
        let repo = seeded().await;
        let found = repo.find_expiring_within_days(30).await.unwrap();
        let names: Vec<_> = found.iter().map(|c| c.document_name.as_str()).collect();
        assert_eq!(names, vec!["Iqama", "Expired"]);
        assert!(found.iter().all(|c| c.category == Category::Client));
    }

    #[tokio::test]
    async fn test_before_date_excludes_null() {
        let repo = seeded().await;
        let found = repo
            .find_expiring_before(now() + Duration::days(365))
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(ExpiryCandidate::is_tracked));
    }

    #[tokio::test]
    async fn test_find_parent() {
        let repo = seeded().await;
        let parent = ParentEntity {
            id: Uuid::new_v4(),
            name: "Acme Co".to_string(),
            phone: Some("0500000000".to_string()),
            email: Some("acme@x.com".to_string()),
        };
        repo.insert_parent(parent.clone()).await;

        assert_eq!(repo.find_parent(parent.id).await.unwrap(), Some(parent));
        assert_eq!(repo.find_parent(Uuid::new_v4()).await.unwrap(), None);
    }
}
