//! Expiry candidate model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;

/// A document whose expiry falls inside a category's lookahead window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryCandidate {
    /// Document identifier.
    pub document_id: Uuid,
    /// Identifier of the client, employee, or company owning the document.
    pub parent_id: Uuid,
    /// Display name of the document (e.g. "Iqama", "Commercial Registration").
    pub document_name: String,
    /// Expiry timestamp. `None` means expiry is not tracked.
    pub expiry_date: Option<DateTime<Utc>>,
    /// Owning category.
    pub category: Category,
}

impl ExpiryCandidate {
    /// Whether this document carries an expiry date at all.
    ///
    /// Untracked documents are never eligible for notification.
    pub fn is_tracked(&self) -> bool {
        self.expiry_date.is_some()
    }

    /// Whether the document had already expired at `now`.
    ///
    /// An untracked document is never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < now)
    }

    /// Whether the document is in-window for a horizon ending at `cutoff`.
    pub fn is_due_by(&self, cutoff: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= cutoff)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn candidate(expiry: Option<DateTime<Utc>>) -> ExpiryCandidate {
        ExpiryCandidate {
            document_id: Uuid::new_v4(),
            parent_id: Uuid::new_v4(),
            document_name: "Iqama".to_string(),
            expiry_date: expiry,
            category: Category::Client,
        }
    }

    #[test]
    fn test_expired_before_now() {
        let now = Utc::now();
        assert!(candidate(Some(now - Duration::days(1))).is_expired_at(now));
        assert!(!candidate(Some(now + Duration::days(10))).is_expired_at(now));
        assert!(!candidate(Some(now)).is_expired_at(now));
    }

    #[test]
    fn test_untracked_is_never_due() {
        let now = Utc::now();
        let c = candidate(None);
        assert!(!c.is_tracked());
        assert!(!c.is_expired_at(now));
        assert!(!c.is_due_by(now + Duration::days(365)));
    }

    #[test]
    fn test_due_by_is_inclusive() {
        let now = Utc::now();
        let cutoff = now + Duration::days(30);
        assert!(candidate(Some(cutoff)).is_due_by(cutoff));
        assert!(!candidate(Some(cutoff + Duration::seconds(1))).is_due_by(cutoff));
    }
}
