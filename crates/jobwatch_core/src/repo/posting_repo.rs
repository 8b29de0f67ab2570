//! Posting repository contract and SQLite implementation.
//!
//! # Invariants
//! - `postings.identity` is the primary key; inserting a known identity is
//!   an `AlreadyExists` error, never a silent overwrite.
//! - Listing order is first-seen order, so reconciliation output is stable
//!   across runs.

use crate::model::identity::PostingIdentity;
use crate::model::posting::Posting;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row};

const POSTING_SELECT_SQL: &str = "SELECT
    identity,
    source_id,
    contest_number,
    title,
    department,
    detail_url
FROM postings";

/// Repository interface for stored postings.
pub trait PostingRepository {
    fn list_postings(&self) -> RepoResult<Vec<Posting>>;
    fn insert_postings(&self, postings: &[Posting]) -> RepoResult<()>;
    /// Deletes by identity. Returns how many rows were removed.
    fn delete_postings(&self, postings: &[Posting]) -> RepoResult<usize>;
}

/// SQLite-backed posting repository.
///
/// Works over a plain connection or an open transaction alike.
pub struct SqlitePostingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PostingRepository for SqlitePostingRepository<'_> {
    fn list_postings(&self) -> RepoResult<Vec<Posting>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POSTING_SELECT_SQL} ORDER BY first_seen_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut postings = Vec::new();

        while let Some(row) = rows.next()? {
            postings.push(parse_posting_row(row)?);
        }

        Ok(postings)
    }

    fn insert_postings(&self, postings: &[Posting]) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO postings (
                identity,
                source_id,
                contest_number,
                title,
                department,
                detail_url
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        )?;

        for posting in postings {
            let inserted = stmt.execute(params![
                posting.identity.as_str(),
                posting.source_id.as_str(),
                posting.source_contest_number.as_str(),
                posting.title.as_str(),
                posting.department.as_str(),
                posting.detail_url.as_str(),
            ]);

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(RepoError::AlreadyExists(posting.identity.to_string()));
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    fn delete_postings(&self, postings: &[Posting]) -> RepoResult<usize> {
        let mut stmt = self
            .conn
            .prepare("DELETE FROM postings WHERE identity = ?1;")?;
        let mut removed = 0;
        for posting in postings {
            removed += stmt.execute([posting.identity.as_str()])?;
        }
        Ok(removed)
    }
}

fn parse_posting_row(row: &Row<'_>) -> RepoResult<Posting> {
    let identity: String = row.get("identity")?;
    if identity.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "empty identity in postings.identity".to_string(),
        ));
    }

    Ok(Posting {
        identity: PostingIdentity::from_stored(identity),
        source_id: row.get("source_id")?,
        source_contest_number: row.get("contest_number")?,
        title: row.get("title")?,
        department: row.get("department")?,
        detail_url: row.get("detail_url")?,
    })
}
