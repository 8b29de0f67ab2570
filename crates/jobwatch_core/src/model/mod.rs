//! Domain model for job postings and their subscribers.
//!
//! # Invariants
//! - A `Posting` is compared across runs only by its `PostingIdentity`.
//! - A posting identity is derived, never assigned by storage.

pub mod identity;
pub mod posting;
pub mod recipient;
