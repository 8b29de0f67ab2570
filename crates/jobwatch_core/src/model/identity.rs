//! Posting identity derivation.
//!
//! The listing source offers no durable key that survives edits to a
//! posting's display text, so identity is a content hash over the
//! source-assigned ids plus the displayed fields. An edited title or
//! department therefore reads as one posting closing and another opening.
//!
//! # Invariants
//! - Derivation is a pure function of its inputs.
//! - Inputs are joined with a unit separator, so moving characters across
//!   a field boundary changes the identity.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

const FIELD_SEPARATOR: char = '\u{1f}';

/// Opaque, stable key for one logical posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingIdentity(String);

impl PostingIdentity {
    /// Wraps an identity value read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PostingIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash strategy used to stamp postings.
///
/// Swapping the implementation changes every identity, so all stored
/// postings would be reported once as closed and once as new.
pub trait IdentityHasher {
    fn derive(&self, parts: &[&str]) -> PostingIdentity;
}

/// Default strategy: lower-case hex SHA-256 over the joined inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Identity;

impl IdentityHasher for Sha256Identity {
    fn derive(&self, parts: &[&str]) -> PostingIdentity {
        let mut hasher = Sha256::new();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                let mut buf = [0_u8; 4];
                hasher.update(FIELD_SEPARATOR.encode_utf8(&mut buf).as_bytes());
            }
            hasher.update(part.as_bytes());
        }
        PostingIdentity(hex::encode(hasher.finalize()))
    }
}
