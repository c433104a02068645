//! Core types shared by the enrichment pipeline
//!
//! - `SearchCandidate`: one raw document from the bibliographic search endpoint
//! - `FetchFailure`: the per-seed failure tags surfaced to callers
//! - `FailedSeed`: a failure attached to the seed it happened for

use serde::{Deserialize, Serialize, Serializer};
use shelf_common::BookSeed;
use thiserror::Error;

/// Raw search result, not yet validated as the right edition
///
/// Field names follow the search endpoint's JSON documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchCandidate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    /// Cover image identifier on the covers host
    #[serde(default)]
    pub cover_i: Option<i64>,
    /// Work key, e.g. "/works/OL45804W"
    #[serde(default)]
    pub key: Option<String>,
    /// Edition identifiers, e.g. "OL7353617M"
    #[serde(default)]
    pub edition_key: Vec<String>,
}

/// Why enrichment of a seed failed
///
/// Only these outcomes reach callers; detail-fetch and persistence problems are
/// recovered where they happen. Serialized as the display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Search returned zero documents
    #[error("Not found")]
    NotFound,

    /// Documents existed but none passed candidate selection
    #[error("No suitable edition found")]
    NoSuitableEdition,

    /// Search request failed (network, timeout, HTTP status or body parse)
    #[error("API request failed")]
    UpstreamRequestFailed,
}

impl Serialize for FetchFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A seed whose enrichment failed, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSeed {
    pub title: String,
    pub author: String,
    pub error: FetchFailure,
}

impl FailedSeed {
    pub fn new(seed: &BookSeed, error: FetchFailure) -> Self {
        Self {
            title: seed.title.clone(),
            author: seed.author.clone(),
            error,
        }
    }
}
