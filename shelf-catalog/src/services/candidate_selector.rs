//! Search candidate selection
//!
//! Picks the edition to enrich from among the search results. Matching is
//! exact on case-folded title and author: substring matches tend to pick up
//! abridged or annotated editions. Upstream order is treated as relevance
//! order, so the first qualifying candidate wins.

use crate::types::{FetchFailure, SearchCandidate};
use shelf_common::models::fold_key;

/// Title fragments marking derivative works rather than the book itself
pub const DISQUALIFYING_TERMS: [&str; 4] = ["annotated", "study guide", "sparknotes", "summary"];

/// Select the best candidate for a target title and author
///
/// `target_title` and `target_author` are expected trimmed and case-folded.
///
/// # Errors
/// - `FetchFailure::NotFound` when `candidates` is empty
/// - `FetchFailure::NoSuitableEdition` when no candidate qualifies
pub fn select_candidate<'a>(
    candidates: &'a [SearchCandidate],
    target_title: &str,
    target_author: &str,
) -> Result<&'a SearchCandidate, FetchFailure> {
    if candidates.is_empty() {
        return Err(FetchFailure::NotFound);
    }

    candidates
        .iter()
        .find(|candidate| qualifies(candidate, target_title, target_author))
        .ok_or(FetchFailure::NoSuitableEdition)
}

fn qualifies(candidate: &SearchCandidate, target_title: &str, target_author: &str) -> bool {
    let Some(title) = candidate.title.as_deref().map(fold_key) else {
        return false;
    };

    title == target_title
        && candidate
            .author_name
            .iter()
            .any(|name| fold_key(name) == target_author)
        && !DISQUALIFYING_TERMS.iter().any(|term| title.contains(term))
}
