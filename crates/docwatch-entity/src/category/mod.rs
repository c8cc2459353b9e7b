//! Entity categories that own expiring documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of entity a document belongs to.
///
/// Each category is scanned by its own scheduled job and has stable job and
/// trigger keys that never change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Documents attached to a client record.
    Client,
    /// Documents attached to an employee record.
    Employee,
    /// Documents belonging to the company itself.
    Company,
}

impl Category {
    /// Every category, in registration order.
    pub const ALL: [Category; 3] = [Self::Client, Self::Employee, Self::Company];

    /// Human-readable label used in subjects and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Employee => "Employee",
            Self::Company => "Company",
        }
    }

    /// Lowercase name used in URLs and configuration sections.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Employee => "employee",
            Self::Company => "company",
        }
    }

    /// Stable scheduler job key.
    pub fn job_key(&self) -> &'static str {
        match self {
            Self::Client => "ClientDocumentExpiryJob",
            Self::Employee => "EmployeeDocumentExpiryJob",
            Self::Company => "CompanyDocumentExpiryJob",
        }
    }

    /// Stable scheduler trigger key.
    pub fn trigger_key(&self) -> &'static str {
        match self {
            Self::Client => "ClientDocumentExpiryTrigger",
            Self::Employee => "EmployeeDocumentExpiryTrigger",
            Self::Company => "CompanyDocumentExpiryTrigger",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid category '{0}'. Use 'client', 'employee', or 'company'.")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive parse; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "employee" => Ok(Self::Employee),
            "company" => Ok(Self::Company),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("client".parse::<Category>().unwrap(), Category::Client);
        assert_eq!("EMPLOYEE".parse::<Category>().unwrap(), Category::Employee);
        assert_eq!(" Company ".parse::<Category>().unwrap(), Category::Company);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "bogus".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("bogus".to_string()));
        assert!(err.to_string().contains("'client', 'employee', or 'company'"));
    }

    #[test]
    fn test_keys_are_distinct() {
        for a in Category::ALL {
            for b in Category::ALL {
                if a != b {
                    assert_ne!(a.job_key(), b.job_key());
                    assert_ne!(a.trigger_key(), b.trigger_key());
                }
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Employee).unwrap();
        assert_eq!(json, "\"employee\"");
    }
}
