//! Notification dispatch boundary.
//!
//! # Responsibility
//! - Define how a posting change is announced to subscribers.
//! - Render the subject/body shared by every transport.
//!
//! # Invariants
//! - An empty recipient list sends nothing and succeeds.
//! - Notifiers do not retry; the first failed send is returned.

use crate::model::posting::Posting;
use crate::model::recipient::Recipient;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod log_only;
pub mod mail_api;

pub use log_only::LogNotifier;
pub use mail_api::{MailApiConfig, MailApiNotifier};

/// Errors a [`Notifier`] may return.
#[derive(Debug)]
pub enum NotifyError {
    Config(String),
    Transport { recipient: String, message: String },
    Rejected { recipient: String, status: u16, body: String },
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "notifier config error: {msg}"),
            Self::Transport { recipient, message } => {
                write!(f, "notification to {recipient} failed: {message}")
            }
            Self::Rejected {
                recipient,
                status,
                body,
            } => write!(
                f,
                "notification to {recipient} rejected with status {status}: {body}"
            ),
        }
    }
}

impl Error for NotifyError {}

/// Announces one posting change to a set of recipients.
pub trait Notifier {
    /// `is_new` is `true` for an opened posting, `false` for a closed one.
    fn notify(
        &self,
        recipients: &[Recipient],
        posting: &Posting,
        is_new: bool,
    ) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(
        &self,
        recipients: &[Recipient],
        posting: &Posting,
        is_new: bool,
    ) -> Result<(), NotifyError> {
        (**self).notify(recipients, posting, is_new)
    }
}

/// Rendered notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn render(posting: &Posting, is_new: bool) -> Self {
        let (subject_prefix, headline) = if is_new {
            ("New job posting", "A new job has been posted.")
        } else {
            ("Job posting closed", "This job is no longer listed.")
        };

        Self {
            subject: format!("{subject_prefix}: {}", posting.title),
            body: format!(
                "{headline}\n\nTitle: {}\nDepartment: {}\nDetails: {}\n",
                posting.title, posting.department, posting.detail_url
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationMessage;
    use crate::model::posting::Posting;

    #[test]
    fn render_distinguishes_new_and_closed() {
        let posting = Posting::new("1", "20-1", "Clerk", "Revenue", "https://jobs.example.org/1");

        let opened = NotificationMessage::render(&posting, true);
        assert_eq!(opened.subject, "New job posting: Clerk");
        assert!(opened.body.contains("Department: Revenue"));
        assert!(opened.body.contains("https://jobs.example.org/1"));

        let closed = NotificationMessage::render(&posting, false);
        assert_eq!(closed.subject, "Job posting closed: Clerk");
        assert!(closed.body.starts_with("This job is no longer listed."));
    }
}
