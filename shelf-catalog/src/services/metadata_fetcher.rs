//! Book metadata fetching
//!
//! Resolves a (title, author) pair into a populated `BookDraft`:
//! 1. Search (failure → "API request failed", no docs → "Not found")
//! 2. Candidate selection (none qualifies → "No suitable edition found")
//! 3. Provisional draft from the chosen candidate
//! 4. Best-effort description from the detail endpoint
//! 5. Description cleanup
//! 6. Override table for remaining placeholders
//!
//! At most two outbound calls per invocation, never retried.

use crate::services::candidate_selector::select_candidate;
use crate::services::openlibrary_client::{detail_path, OpenLibraryClient};
use crate::services::overrides::apply_override;
use crate::services::text_normalizer::clean_description;
use crate::types::{FetchFailure, SearchCandidate};
use shelf_common::models::{fold_key, UNKNOWN_AUTHOR};
use shelf_common::BookDraft;
use tracing::{debug, info, warn};

/// Metadata fetcher
pub struct MetadataFetcher {
    client: OpenLibraryClient,
}

impl MetadataFetcher {
    pub fn new(client: OpenLibraryClient) -> Self {
        Self { client }
    }

    /// Fetch and assemble book metadata
    ///
    /// # Errors
    /// Returns the `FetchFailure` tag for search failures, empty results and
    /// unqualified results. Detail-fetch problems never fail the call.
    pub async fn fetch(&self, title: &str, author: &str) -> Result<BookDraft, FetchFailure> {
        let title = title.trim();
        let author = author.trim();

        let candidates = self.client.search(title, author).await.map_err(|e| {
            warn!(title = %title, author = %author, error = %e, "Search request failed");
            FetchFailure::UpstreamRequestFailed
        })?;

        let candidate = select_candidate(&candidates, &fold_key(title), &fold_key(author))
            .map_err(|failure| {
                info!(
                    title = %title,
                    author = %author,
                    results = candidates.len(),
                    reason = %failure,
                    "No usable search result"
                );
                failure
            })?;

        let mut draft = self.provisional_draft(candidate);

        if let Some(path) = detail_path(candidate) {
            match self.client.fetch_description(&path).await {
                Ok(raw) => draft.description = clean_description(raw.as_deref()),
                Err(e) => {
                    // Provisional draft stands
                    warn!(
                        title = %draft.title,
                        detail_path = %path,
                        error = %e,
                        "Detail fetch failed, keeping provisional metadata"
                    );
                }
            }
        }

        if apply_override(&mut draft) {
            debug!(title = %draft.title, "Filled placeholders from override table");
        }

        info!(
            title = %draft.title,
            author = %draft.author,
            year = ?draft.publication_year,
            has_description = draft.description.is_some(),
            has_cover = draft.cover_image.is_some(),
            "Fetched book metadata"
        );

        Ok(draft)
    }

    fn provisional_draft(&self, candidate: &SearchCandidate) -> BookDraft {
        BookDraft {
            title: candidate.title.clone().unwrap_or_default(),
            author: candidate
                .author_name
                .first()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            publication_year: candidate.first_publish_year,
            description: None,
            cover_image: candidate.cover_i.map(|id| self.client.cover_url(id)),
        }
    }
}
