//! One fetch–reconcile–persist–notify run.
//!
//! # Responsibility
//! - Drive a single run from a [`RunContext`] that owns the listing source,
//!   the persistence gateway and the notifier for that run only.
//! - Translate boundary failures into the [`RunError`] taxonomy.
//!
//! # Invariants
//! - Nothing is written to the store unless every raw record normalized.
//! - Notifications start only after the delta is committed, and a failed
//!   notification never rolls the delta back.
//! - The gateway is closed on every exit path of [`RunContext::execute`].

use crate::model::recipient::Recipient;
use crate::notify::{Notifier, NotifyError};
use crate::reconcile::engine::{reconcile, ReconciliationDelta};
use crate::reconcile::normalizer::{MalformedRecordError, PostingNormalizer};
use crate::repo::gateway::PersistenceGateway;
use crate::repo::RepoError;
use crate::source::{ListingSource, SourceError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// A remote call failed.
#[derive(Debug)]
pub enum TransportError {
    Fetch(SourceError),
    Notify(NotifyError),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Notify(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Notify(err) => Some(err),
        }
    }
}

/// Why a run stopped.
#[derive(Debug)]
pub enum RunError {
    /// Raw record at `index` did not match the field layout.
    MalformedRecord {
        index: usize,
        source: MalformedRecordError,
    },
    Transport(TransportError),
    Persistence(RepoError),
}

impl RunError {
    /// Process exit status the CLI reports for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MalformedRecord { .. } => 2,
            Self::Transport(_) => 3,
            Self::Persistence(_) => 4,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "malformed_record",
            Self::Transport(_) => "transport",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRecord { index, source } => {
                write!(f, "record #{index} is malformed: {source}")
            }
            Self::Transport(err) => write!(f, "transport failure: {err}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedRecord { source, .. } => Some(source),
            Self::Transport(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for RunError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

impl From<SourceError> for RunError {
    fn from(value: SourceError) -> Self {
        Self::Transport(TransportError::Fetch(value))
    }
}

impl From<NotifyError> for RunError {
    fn from(value: NotifyError) -> Self {
        Self::Transport(TransportError::Notify(value))
    }
}

/// Counters reported at the end of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub known: usize,
    pub saved: usize,
    pub deleted: usize,
    pub recipients: usize,
    /// Postings announced; each announcement goes to every recipient.
    pub notifications: usize,
}

impl RunSummary {
    pub fn has_changes(&self) -> bool {
        self.saved + self.deleted > 0
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fetched={} known={} saved={} deleted={} recipients={} notifications={}",
            self.fetched, self.known, self.saved, self.deleted, self.recipients, self.notifications
        )
    }
}

/// Everything one run needs, constructed at run start and consumed by it.
pub struct RunContext<S, G, N> {
    source: S,
    gateway: G,
    notifier: N,
    normalizer: PostingNormalizer,
}

impl<S, G, N> RunContext<S, G, N>
where
    S: ListingSource,
    G: PersistenceGateway,
    N: Notifier,
{
    pub fn new(source: S, gateway: G, notifier: N) -> Self {
        Self {
            source,
            gateway,
            notifier,
            normalizer: PostingNormalizer::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: PostingNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Runs once and releases the gateway, whatever the outcome.
    pub fn execute(mut self) -> Result<RunSummary, RunError> {
        let started_at = Instant::now();
        info!(
            "event=run module=service status=start source={}",
            self.source.name()
        );

        let outcome = self.run_steps();
        let closed = self.gateway.close();

        let result = match (outcome, closed) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(close_err)) => Err(RunError::Persistence(close_err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                error!("event=store_close module=service status=error error={close_err}");
                Err(err)
            }
        };

        match &result {
            Ok(summary) => info!(
                "event=run module=service status=ok duration_ms={} {summary}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=run module=service status=error kind={} duration_ms={} error={err}",
                err.kind(),
                started_at.elapsed().as_millis()
            ),
        }

        result
    }

    fn run_steps(&mut self) -> Result<RunSummary, RunError> {
        let raw_records = self.source.fetch_postings()?;
        let remote = self
            .normalizer
            .normalize_all(&raw_records)
            .map_err(|(index, source)| RunError::MalformedRecord { index, source })?;

        let known = self.gateway.load_known_postings()?;
        let recipients = self.gateway.load_recipients()?;

        let delta = reconcile(&remote, &known);
        let mut summary = RunSummary {
            fetched: remote.len(),
            known: known.len(),
            recipients: recipients.len(),
            ..RunSummary::default()
        };

        if !delta.has_changes() {
            info!("event=reconcile module=service status=ok changes=0");
            return Ok(summary);
        }
        if remote.is_empty() {
            // TODO: gate mass deletion on an empty listing once a minimum-listing policy is agreed.
            warn!(
                "event=reconcile module=service status=ok empty_remote=true deleting={}",
                delta.to_delete.len()
            );
        }

        self.gateway.apply_delta(&delta)?;
        summary.saved = delta.to_save.len();
        summary.deleted = delta.to_delete.len();

        summary.notifications = self.dispatch(&delta, &recipients)?;
        Ok(summary)
    }

    fn dispatch(
        &self,
        delta: &ReconciliationDelta,
        recipients: &[Recipient],
    ) -> Result<usize, RunError> {
        let announcements = delta
            .to_save
            .iter()
            .map(|posting| (posting, true))
            .chain(delta.to_delete.iter().map(|posting| (posting, false)));

        let mut dispatched = 0;
        for (posting, is_new) in announcements {
            self.notifier.notify(recipients, posting, is_new)?;
            dispatched += 1;
        }
        Ok(dispatched)
    }
}
