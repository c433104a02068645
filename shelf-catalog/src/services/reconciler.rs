//! Seed reconciliation
//!
//! `LOOKUP → (HIT | MISS) → [FETCH] → UPSERT → RESULT`
//!
//! A fully enriched HIT is returned without touching the network or the store.
//! Anything else goes through the metadata fetcher; successful drafts are
//! upserted with the store's non-regression merge.

use crate::db::BookStore;
use crate::services::metadata_fetcher::MetadataFetcher;
use crate::types::FailedSeed;
use shelf_common::{BookDraft, BookRecord, BookSeed};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of reconciling one seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Store already held a fully enriched row
    Cached(BookRecord),
    /// Fetched and persisted
    Stored(BookRecord),
    /// Fetched, but the upsert failed; the draft is still a success
    Unpersisted(BookDraft),
    /// Fetch failed; nothing was written
    Failed(FailedSeed),
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ReconcileOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&FailedSeed> {
        match self {
            ReconcileOutcome::Failed(failed) => Some(failed),
            _ => None,
        }
    }
}

/// Reconciliation engine
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn BookStore>,
    fetcher: Arc<MetadataFetcher>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn BookStore>, fetcher: Arc<MetadataFetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Reconcile one seed against the store
    ///
    /// Never returns an error: lookup and persistence problems are logged and
    /// recovered, fetch problems become `ReconcileOutcome::Failed`.
    pub async fn reconcile(&self, seed: &BookSeed) -> ReconcileOutcome {
        let existing = match self.store.find_by_title_author(&seed.title, &seed.author).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    title = %seed.title,
                    author = %seed.author,
                    error = %e,
                    "Store lookup failed, treating as miss"
                );
                None
            }
        };

        match &existing {
            Some(record) if record.is_fully_enriched() => {
                debug!(id = record.id, title = %record.title, "Store hit, skipping fetch");
                return ReconcileOutcome::Cached(record.clone());
            }
            Some(record) => {
                debug!(
                    id = record.id,
                    title = %record.title,
                    has_description = record.description.is_some(),
                    has_cover = record.cover_image.is_some(),
                    "Store hit with placeholders, refetching"
                );
            }
            None => {
                debug!(title = %seed.title, author = %seed.author, "Store miss, fetching");
            }
        }

        let mut draft = match self.fetcher.fetch(&seed.title, &seed.author).await {
            Ok(draft) => draft,
            Err(failure) => {
                info!(
                    title = %seed.title,
                    author = %seed.author,
                    reason = %failure,
                    "Seed enrichment failed"
                );
                return ReconcileOutcome::Failed(FailedSeed::new(seed, failure));
            }
        };

        // Merge into the row that was hit, whatever spelling the candidate used
        if let Some(record) = existing {
            draft.title = record.title;
            draft.author = record.author;
        }

        match self.store.upsert(&draft).await {
            Ok(record) => ReconcileOutcome::Stored(record),
            Err(e) => {
                error!(
                    title = %draft.title,
                    author = %draft.author,
                    error = %e,
                    "Failed to persist fetched metadata"
                );
                ReconcileOutcome::Unpersisted(draft)
            }
        }
    }
}
