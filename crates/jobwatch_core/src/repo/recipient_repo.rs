//! Recipient repository contract and SQLite implementation.
//!
//! # Invariants
//! - `recipients.email` is unique; callers pass already-normalized
//!   addresses.
//! - `recipient_id` and `date_added` are assigned by storage.

use crate::model::recipient::{Recipient, RecipientId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

const RECIPIENT_SELECT_SQL: &str = "SELECT recipient_id, email, date_added FROM recipients";

/// Repository interface for notification subscribers.
pub trait RecipientRepository {
    fn list_recipients(&self) -> RepoResult<Vec<Recipient>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Recipient>>;
    fn insert_recipient(&self, email: &str) -> RepoResult<Recipient>;
    fn delete_recipient(&self, email: &str) -> RepoResult<()>;
}

/// SQLite-backed recipient repository.
pub struct SqliteRecipientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecipientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_by_id(&self, recipient_id: RecipientId) -> RepoResult<Recipient> {
        self.conn
            .query_row(
                &format!("{RECIPIENT_SELECT_SQL} WHERE recipient_id = ?1;"),
                [recipient_id],
                parse_recipient_row,
            )
            .optional()?
            .ok_or_else(|| RepoError::NotFound(format!("recipient {recipient_id}")))
    }
}

impl RecipientRepository for SqliteRecipientRepository<'_> {
    fn list_recipients(&self) -> RepoResult<Vec<Recipient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECIPIENT_SELECT_SQL} ORDER BY recipient_id ASC;"))?;
        let recipients = stmt
            .query_map([], parse_recipient_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipients)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Recipient>> {
        let recipient = self
            .conn
            .query_row(
                &format!("{RECIPIENT_SELECT_SQL} WHERE email = ?1;"),
                [email],
                parse_recipient_row,
            )
            .optional()?;
        Ok(recipient)
    }

    fn insert_recipient(&self, email: &str) -> RepoResult<Recipient> {
        match self
            .conn
            .execute("INSERT INTO recipients (email) VALUES (?1);", [email])
        {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(RepoError::AlreadyExists(email.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        self.get_by_id(self.conn.last_insert_rowid())
    }

    fn delete_recipient(&self, email: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recipients WHERE email = ?1;", [email])?;
        if changed == 0 {
            return Err(RepoError::NotFound(email.to_string()));
        }
        Ok(())
    }
}

fn parse_recipient_row(row: &Row<'_>) -> rusqlite::Result<Recipient> {
    Ok(Recipient {
        recipient_id: row.get("recipient_id")?,
        email: row.get("email")?,
        date_added: row.get("date_added")?,
    })
}
