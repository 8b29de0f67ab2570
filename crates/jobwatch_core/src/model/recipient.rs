//! Notification subscriber model.

use serde::{Deserialize, Serialize};

/// Storage-assigned recipient key.
pub type RecipientId = i64;

/// A subscriber who is told about new and closed postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub recipient_id: RecipientId,
    /// Normalized (trimmed, lower-case) address; unique per recipient.
    pub email: String,
    /// Unix epoch milliseconds.
    pub date_added: i64,
}
