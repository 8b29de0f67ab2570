//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the data access contracts for postings and recipients.
//! - Expose the run-scoped persistence gateway consumed by orchestration.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Multi-row writes are applied inside one transaction.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gateway;
pub mod posting_repo;
pub mod recipient_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(String),
    AlreadyExists(String),
    InvalidData(String),
    /// The gateway was used after `close()`.
    Closed,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::AlreadyExists(key) => write!(f, "record already exists: {key}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Closed => write!(f, "persistence gateway is already closed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
