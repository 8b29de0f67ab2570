//! Run-scoped persistence gateway.
//!
//! # Responsibility
//! - Give one run everything it reads from and writes to storage.
//! - Own the store connection for exactly one run and release it on every
//!   exit path.
//!
//! # Invariants
//! - `close()` is idempotent; any other call after it fails with
//!   `RepoError::Closed`.
//! - `SqliteGateway::apply_delta` inserts and deletes in one transaction.

use crate::db::{open_db, open_db_in_memory};
use crate::model::posting::Posting;
use crate::model::recipient::Recipient;
use crate::reconcile::engine::ReconciliationDelta;
use crate::repo::posting_repo::{PostingRepository, SqlitePostingRepository};
use crate::repo::recipient_repo::{RecipientRepository, SqliteRecipientRepository};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;

/// Storage operations consumed by run orchestration.
pub trait PersistenceGateway {
    fn load_known_postings(&self) -> RepoResult<Vec<Posting>>;
    fn load_recipients(&self) -> RepoResult<Vec<Recipient>>;
    fn save_postings(&mut self, postings: &[Posting]) -> RepoResult<()>;
    fn delete_postings(&mut self, postings: &[Posting]) -> RepoResult<()>;

    /// Persists a whole delta: inserts first, then deletes.
    fn apply_delta(&mut self, delta: &ReconciliationDelta) -> RepoResult<()> {
        self.save_postings(&delta.to_save)?;
        self.delete_postings(&delta.to_delete)
    }

    fn close(&mut self) -> RepoResult<()>;
}

/// Gateway over one SQLite connection.
pub struct SqliteGateway {
    conn: Option<Connection>,
}

impl SqliteGateway {
    /// Opens and migrates the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Borrows the live connection, e.g. for recipient management.
    pub fn connection(&self) -> RepoResult<&Connection> {
        self.conn.as_ref().ok_or(RepoError::Closed)
    }

    fn connection_mut(&mut self) -> RepoResult<&mut Connection> {
        self.conn.as_mut().ok_or(RepoError::Closed)
    }

    fn write_in_transaction(
        &mut self,
        to_save: &[Posting],
        to_delete: &[Posting],
    ) -> RepoResult<()> {
        let conn = self.connection_mut()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let repo = SqlitePostingRepository::new(&tx);
            repo.insert_postings(to_save)?;
            let removed = repo.delete_postings(to_delete)?;
            if removed != to_delete.len() {
                warn!(
                    "event=postings_delete module=repo status=partial requested={} removed={removed}",
                    to_delete.len()
                );
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl PersistenceGateway for SqliteGateway {
    fn load_known_postings(&self) -> RepoResult<Vec<Posting>> {
        SqlitePostingRepository::new(self.connection()?).list_postings()
    }

    fn load_recipients(&self) -> RepoResult<Vec<Recipient>> {
        SqliteRecipientRepository::new(self.connection()?).list_recipients()
    }

    fn save_postings(&mut self, postings: &[Posting]) -> RepoResult<()> {
        self.write_in_transaction(postings, &[])
    }

    fn delete_postings(&mut self, postings: &[Posting]) -> RepoResult<()> {
        self.write_in_transaction(&[], postings)
    }

    fn apply_delta(&mut self, delta: &ReconciliationDelta) -> RepoResult<()> {
        self.write_in_transaction(&delta.to_save, &delta.to_delete)?;
        info!(
            "event=delta_apply module=repo status=ok saved={} deleted={}",
            delta.to_save.len(),
            delta.to_delete.len()
        );
        Ok(())
    }

    fn close(&mut self) -> RepoResult<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().map_err(|(_, err)| RepoError::from(err))?;
                info!("event=store_close module=repo status=ok");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for SqliteGateway {
    fn drop(&mut self) {
        if self.conn.is_some() {
            if let Err(err) = self.close() {
                warn!("event=store_close module=repo status=error on_drop=true error={err}");
            }
        }
    }
}
