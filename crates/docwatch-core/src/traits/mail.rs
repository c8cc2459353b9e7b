//! Mail-sending port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Mailbox the message is sent from.
    pub sender: String,
    /// Mailbox that receives the message.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Delivers rendered messages. Implementations hold their own credentials.
///
/// A non-success response from the underlying transport must be returned as
/// an error carrying the transport's diagnostic text.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}
