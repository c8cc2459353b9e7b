//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Mail capability configuration.
///
/// Every notification goes to `recipient`, the operator mailbox. Parent
/// contact details only appear inside the message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mailbox the message is sent from.
    pub sender: String,
    /// Operator mailbox that receives every notification.
    pub recipient: String,
    /// Bearer credential for the mail API.
    #[serde(default)]
    pub access_token: String,
    /// Base URL of the Microsoft Graph API.
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    /// Contact shown in the body when a parent has no email of its own.
    /// Falls back to `recipient` when unset.
    #[serde(default)]
    pub fallback_contact: Option<String>,
    /// Organization name printed in the message signature.
    #[serde(default = "default_signature")]
    pub signature: String,
}

impl MailConfig {
    /// The contact address used when a parent has no email.
    pub fn fallback_contact(&self) -> &str {
        self.fallback_contact
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.recipient)
    }
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_signature() -> String {
    "Compliance Team".to_string()
}
