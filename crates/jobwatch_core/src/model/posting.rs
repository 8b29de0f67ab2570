//! Posting domain model.
//!
//! # Invariants
//! - `identity` is derived from the five other fields; two postings built
//!   from identical fields with the same hasher share an identity.
//! - Postings read back from storage keep the identity they were stored
//!   with.

use crate::model::identity::{IdentityHasher, PostingIdentity, Sha256Identity};
use serde::{Deserialize, Serialize};

/// One job listing, normalized and identity-stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub identity: PostingIdentity,
    /// Source-assigned job id. Not unique on its own.
    pub source_id: String,
    /// Source-assigned contest number, also used to build `detail_url`.
    pub source_contest_number: String,
    pub title: String,
    pub department: String,
    pub detail_url: String,
}

impl Posting {
    /// Builds a posting stamped with the default [`Sha256Identity`].
    pub fn new(
        source_id: impl Into<String>,
        source_contest_number: impl Into<String>,
        title: impl Into<String>,
        department: impl Into<String>,
        detail_url: impl Into<String>,
    ) -> Self {
        Self::with_hasher(
            &Sha256Identity,
            source_id,
            source_contest_number,
            title,
            department,
            detail_url,
        )
    }

    /// Builds a posting stamped by the given hash strategy.
    pub fn with_hasher(
        hasher: &dyn IdentityHasher,
        source_id: impl Into<String>,
        source_contest_number: impl Into<String>,
        title: impl Into<String>,
        department: impl Into<String>,
        detail_url: impl Into<String>,
    ) -> Self {
        let source_id = source_id.into();
        let source_contest_number = source_contest_number.into();
        let title = title.into();
        let department = department.into();
        let detail_url = detail_url.into();
        let identity = hasher.derive(&[
            source_id.as_str(),
            source_contest_number.as_str(),
            detail_url.as_str(),
            title.as_str(),
            department.as_str(),
        ]);

        Self {
            identity,
            source_id,
            source_contest_number,
            title,
            department,
            detail_url,
        }
    }
}
