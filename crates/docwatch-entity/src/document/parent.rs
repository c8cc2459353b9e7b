//! Parent entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The client, employee, or company that owns an expiring document.
///
/// Repositories map their category-specific columns into this single shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentEntity {
    /// Entity identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
}

impl ParentEntity {
    /// Contact phone, ignoring blank values.
    pub fn contact_phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    /// Contact email, ignoring blank values.
    pub fn contact_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
