//! Email notifier over a Postmark-compatible HTTP mail API.
//!
//! # Invariants
//! - One `POST {endpoint}/email` per recipient, in recipient order.
//! - Sending stops at the first failed recipient.

use crate::model::posting::Posting;
use crate::model::recipient::Recipient;
use crate::notify::{NotificationMessage, Notifier, NotifyError};
use log::{error, info};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Postmark-Server-Token";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Mail API connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailApiConfig {
    /// Base URL, without the trailing `/email`.
    pub endpoint: String,
    pub api_token: String,
    pub from_address: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

pub struct MailApiNotifier {
    config: MailApiConfig,
    email_url: String,
    client: Client,
}

impl MailApiNotifier {
    pub fn new(config: MailApiConfig) -> Result<Self, NotifyError> {
        if config.api_token.trim().is_empty() {
            return Err(NotifyError::Config("mail API token is empty".to_string()));
        }
        if config.from_address.trim().is_empty() {
            return Err(NotifyError::Config("sender address is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| NotifyError::Config(err.to_string()))?;
        let email_url = format!("{}/email", config.endpoint.trim_end_matches('/'));

        Ok(Self {
            config,
            email_url,
            client,
        })
    }

    fn send_one(&self, to: &str, message: &NotificationMessage) -> Result<(), NotifyError> {
        let email = OutboundEmail {
            from: &self.config.from_address,
            to,
            subject: &message.subject,
            text_body: &message.body,
        };

        let response = self
            .client
            .post(&self.email_url)
            .header(ACCEPT, "application/json")
            .header(TOKEN_HEADER, &self.config.api_token)
            .json(&email)
            .send()
            .map_err(|err| NotifyError::Transport {
                recipient: to.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                recipient: to.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(())
    }
}

impl Notifier for MailApiNotifier {
    fn notify(
        &self,
        recipients: &[Recipient],
        posting: &Posting,
        is_new: bool,
    ) -> Result<(), NotifyError> {
        let message = NotificationMessage::render(posting, is_new);
        for recipient in recipients {
            if let Err(err) = self.send_one(&recipient.email, &message) {
                error!(
                    "event=notify module=notify status=error transport=mail_api identity={} error={err}",
                    posting.identity
                );
                return Err(err);
            }
        }
        info!(
            "event=notify module=notify status=ok transport=mail_api identity={} is_new={is_new} recipients={}",
            posting.identity,
            recipients.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MailApiConfig, MailApiNotifier};
    use crate::notify::NotifyError;
    use std::time::Duration;

    #[test]
    fn new_rejects_blank_token() {
        let config = MailApiConfig {
            endpoint: "https://mail.example.org".to_string(),
            api_token: "  ".to_string(),
            from_address: "jobs@example.org".to_string(),
            timeout: Duration::from_secs(5),
        };
        let err = MailApiNotifier::new(config).err().unwrap();
        assert!(matches!(err, NotifyError::Config(_)));
    }
}
