//! Remote listing source boundary.
//!
//! This module defines the source trait and its error type; the concrete
//! job-board client lives in [`taleo`]. Normalization of what a source
//! returns belongs to `reconcile::normalizer`, not here.

use crate::reconcile::normalizer::RawRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod taleo;

/// Errors a [`ListingSource`] may return.
#[derive(Debug)]
pub enum SourceError {
    /// The HTTP client could not be built from configuration.
    Config(String),
    /// Network or transport failure.
    Transport(String),
    /// The source answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    Decode(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "listing source config error: {msg}"),
            Self::Transport(msg) => write!(f, "listing source transport error: {msg}"),
            Self::Status { status, body } => {
                write!(f, "listing source returned status {status}: {body}")
            }
            Self::Decode(msg) => write!(f, "listing source decode error: {msg}"),
        }
    }
}

impl Error for SourceError {}

/// Upstream job board.
///
/// One call per run; implementations do not retry.
pub trait ListingSource {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Returns raw records in the order the source listed them.
    fn fetch_postings(&self) -> Result<Vec<RawRecord>, SourceError>;
}
