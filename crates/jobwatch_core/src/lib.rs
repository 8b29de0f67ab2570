//! Core domain logic for jobwatch.
//! Fetches job postings, reconciles them against the store and announces
//! what opened and closed to subscribers.

pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reconcile;
pub mod repo;
pub mod service;
pub mod source;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::identity::{IdentityHasher, PostingIdentity, Sha256Identity};
pub use model::posting::Posting;
pub use model::recipient::{Recipient, RecipientId};
pub use notify::{
    LogNotifier, MailApiConfig, MailApiNotifier, NotificationMessage, Notifier, NotifyError,
};
pub use reconcile::engine::{reconcile, ReconciliationDelta};
pub use reconcile::index::IdentityIndex;
pub use reconcile::normalizer::{FieldLayout, MalformedRecordError, PostingNormalizer, RawRecord};
pub use repo::gateway::{PersistenceGateway, SqliteGateway};
pub use repo::posting_repo::{PostingRepository, SqlitePostingRepository};
pub use repo::recipient_repo::{RecipientRepository, SqliteRecipientRepository};
pub use repo::{RepoError, RepoResult};
pub use service::recipient_service::{
    normalize_email, RecipientService, RecipientServiceError, RecipientServiceResult,
};
pub use service::run_service::{RunContext, RunError, RunSummary, TransportError};
pub use source::taleo::{TaleoConfig, TaleoSource};
pub use source::{ListingSource, SourceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
