//! Reconciliation core: raw records in, posting delta out.
//!
//! # Responsibility
//! - Normalize raw listing records into identity-stamped postings.
//! - Compute which postings opened and which closed since the last run.
//!
//! # Invariants
//! - Nothing in this module performs I/O.
//! - Comparison between runs is by `PostingIdentity` only.

pub mod engine;
pub mod index;
pub mod normalizer;
