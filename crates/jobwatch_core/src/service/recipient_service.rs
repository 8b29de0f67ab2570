//! Subscriber management use-cases.
//!
//! # Invariants
//! - Addresses are trimmed and lower-cased before they reach storage, so
//!   `Ann@Example.org` and `ann@example.org` are the same subscriber.
//! - Only addresses of the shape `local@domain.tld` are accepted.

use crate::model::recipient::Recipient;
use crate::repo::recipient_repo::RecipientRepository;
use crate::repo::RepoError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Service error for recipient use-cases.
#[derive(Debug)]
pub enum RecipientServiceError {
    InvalidEmail(String),
    AlreadySubscribed(String),
    NotSubscribed(String),
    Repo(RepoError),
}

impl Display for RecipientServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::AlreadySubscribed(email) => write!(f, "{email} is already subscribed"),
            Self::NotSubscribed(email) => write!(f, "{email} is not subscribed"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecipientServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RecipientServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::AlreadyExists(email) => Self::AlreadySubscribed(email),
            RepoError::NotFound(email) => Self::NotSubscribed(email),
            other => Self::Repo(other),
        }
    }
}

pub type RecipientServiceResult<T> = Result<T, RecipientServiceError>;

/// Normalizes and validates one email address.
pub fn normalize_email(email: &str) -> RecipientServiceResult<String> {
    let normalized = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(RecipientServiceError::InvalidEmail(email.to_string()));
    }
    Ok(normalized)
}

pub struct RecipientService<R: RecipientRepository> {
    repo: R,
}

impl<R: RecipientRepository> RecipientService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_recipient(&self, email: &str) -> RecipientServiceResult<Recipient> {
        let email = normalize_email(email)?;
        let recipient = self.repo.insert_recipient(&email)?;
        info!(
            "event=recipient_add module=service status=ok recipient_id={}",
            recipient.recipient_id
        );
        Ok(recipient)
    }

    pub fn remove_recipient(&self, email: &str) -> RecipientServiceResult<()> {
        let email = normalize_email(email)?;
        self.repo.delete_recipient(&email)?;
        info!("event=recipient_remove module=service status=ok");
        Ok(())
    }

    /// Lists subscribers in the order they were added.
    pub fn list_recipients(&self) -> RecipientServiceResult<Vec<Recipient>> {
        Ok(self.repo.list_recipients()?)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, RecipientServiceError};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Ann.Lee@Example.ORG ").unwrap(),
            "ann.lee@example.org"
        );
    }

    #[test]
    fn normalize_email_rejects_bad_shapes() {
        for bad in ["", "ann", "ann@", "@example.org", "ann@example", "a nn@example.org"] {
            let err = normalize_email(bad).unwrap_err();
            assert!(
                matches!(err, RecipientServiceError::InvalidEmail(_)),
                "accepted `{bad}`"
            );
        }
    }
}
