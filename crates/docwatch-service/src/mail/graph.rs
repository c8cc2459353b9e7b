//! Microsoft Graph `sendMail` transport.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use docwatch_core::config::MailConfig;
use docwatch_core::error::{AppError, ErrorKind};
use docwatch_core::result::AppResult;
use docwatch_core::traits::{MailMessage, MailSender};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: GraphMessage<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage<'a> {
    subject: &'a str,
    body: GraphBody<'a>,
    to_recipients: Vec<GraphRecipient<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphBody<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecipient<'a> {
    email_address: GraphAddress<'a>,
}

#[derive(Debug, Serialize)]
struct GraphAddress<'a> {
    address: &'a str,
}

impl<'a> SendMailRequest<'a> {
    fn from_message(message: &'a MailMessage) -> Self {
        Self {
            message: GraphMessage {
                subject: &message.subject,
                body: GraphBody {
                    content_type: "HTML",
                    content: &message.html_body,
                },
                to_recipients: vec![GraphRecipient {
                    email_address: GraphAddress {
                        address: &message.recipient,
                    },
                }],
            },
        }
    }
}

/// Sends mail through `POST {base}/users/{sender}/sendMail`.
pub struct GraphMailSender {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl fmt::Debug for GraphMailSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphMailSender")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GraphMailSender {
    /// Build a sender whose HTTP client gives up after `call_timeout`.
    pub fn new(config: &MailConfig, call_timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build mail client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn endpoint(&self, sender: &str) -> String {
        format!("{}/users/{}/sendMail", self.base_url, sender)
    }
}

#[async_trait]
impl MailSender for GraphMailSender {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        let response = self
            .client
            .post(self.endpoint(&message.sender))
            .bearer_auth(&self.access_token)
            .json(&SendMailRequest::from_message(message))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout(format!("Mail API did not answer in time: {e}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Delivery,
                        format!("Mail API request failed: {e}"),
                        e,
                    )
                }
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = %status, recipient = %message.recipient, "Mail API accepted message");
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(AppError::delivery(format!(
            "Mail API returned {status}: {detail}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            sender: "alerts@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
            subject: "[Company] Reminder: CR Expiring Soon".to_string(),
            html_body: "<p>hello</p>".to_string(),
        }
    }

    #[test]
    fn test_payload_shape() {
        let msg = message();
        let json = serde_json::to_value(SendMailRequest::from_message(&msg)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": {
                    "subject": "[Company] Reminder: CR Expiring Soon",
                    "body": { "contentType": "HTML", "content": "<p>hello</p>" },
                    "toRecipients": [ { "emailAddress": { "address": "ops@example.com" } } ]
                }
            })
        );
    }

    #[test]
    fn test_endpoint_uses_sender_mailbox() {
        let config = MailConfig {
            sender: "alerts@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
            access_token: "t".to_string(),
            graph_base_url: "https://graph.microsoft.com/v1.0/".to_string(),
            fallback_contact: None,
            signature: "Compliance Team".to_string(),
        };
        let sender = GraphMailSender::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(
            sender.endpoint("alerts@example.com"),
            "https://graph.microsoft.com/v1.0/users/alerts@example.com/sendMail"
        );
    }
}
