//! Expiry notifier: renders a notice and hands it to the mail capability.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;

use docwatch_core::config::MailConfig;
use docwatch_core::error::{AppError, ErrorKind};
use docwatch_core::result::AppResult;
use docwatch_core::traits::{MailMessage, MailSender};
use docwatch_entity::Category;

use super::template;

/// Everything the notifier needs to describe one expiring document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryNotice {
    /// Display name of the owning entity.
    pub parent_name: String,
    /// Display name of the document.
    pub document_name: String,
    /// Contact phone of the owner, or an empty string.
    pub phone: String,
    /// Expiry instant of the document.
    pub expiry_date: DateTime<Utc>,
    /// Whether the document had already expired when the run started.
    pub is_expired: bool,
    /// Category the document belongs to.
    pub category: Category,
    /// Contact email of the owner, or the configured fallback contact.
    pub parent_email: String,
}

/// Sends one operator notification per expiring document.
///
/// Every message goes to the configured operator mailbox; parent contact
/// details only appear inside the body.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn MailSender>,
    sender: String,
    recipient: String,
    signature: String,
    call_timeout: Duration,
    span: tracing::Span,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Create a notifier over the given mail capability.
    pub fn new(mailer: Arc<dyn MailSender>, config: &MailConfig, call_timeout: Duration) -> Self {
        Self {
            mailer,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            signature: config.signature.clone(),
            call_timeout,
            span: tracing::info_span!("notifier", recipient = %config.recipient),
        }
    }

    /// Render a notice into a message without sending it.
    pub fn render(&self, notice: &ExpiryNotice) -> MailMessage {
        MailMessage {
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            subject: template::subject(notice),
            html_body: template::html_body(notice, &self.recipient, &self.signature),
        }
    }

    /// Render and send one notice.
    ///
    /// Any failure is reported as a `Delivery` error: a rejection by the mail
    /// capability, a transport timeout, or no answer within the configured
    /// call timeout.
    pub async fn notify(&self, notice: &ExpiryNotice) -> AppResult<()> {
        let message = self.render(notice);

        async {
            let outcome = tokio::time::timeout(self.call_timeout, self.mailer.send(&message)).await;
            match outcome {
                Ok(Ok(())) => {
                    tracing::info!(
                        category = %notice.category,
                        document = %notice.document_name,
                        subject = %message.subject,
                        "Expiry notification sent"
                    );
                    Ok(())
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        category = %notice.category,
                        document = %notice.document_name,
                        error = %e,
                        "Failed to send expiry notification"
                    );
                    Err(match e.kind {
                        ErrorKind::Delivery => e,
                        _ => AppError::delivery(e.message),
                    })
                }
                Err(_) => {
                    tracing::error!(
                        category = %notice.category,
                        document = %notice.document_name,
                        timeout_secs = self.call_timeout.as_secs(),
                        "Mail send timed out"
                    );
                    Err(AppError::delivery(format!(
                        "Mail send timed out after {}s",
                        self.call_timeout.as_secs()
                    )))
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }
}
