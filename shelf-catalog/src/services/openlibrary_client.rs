//! Open Library API client
//!
//! Two endpoints are used:
//! - `GET {base}/search.json?title=..&author=..` returning candidate documents
//! - `GET {base}/works/{id}.json` (or `/books/{id}.json` for editions) returning
//!   an optional description
//!
//! Every request carries the configured timeout. No retries: a failed call is
//! terminal for the invocation that made it.

use crate::types::SearchCandidate;
use serde::Deserialize;
use shelf_common::config::CatalogConfig;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("Shelf/", env!("CARGO_PKG_VERSION"), " (catalog enrichment)");

/// Open Library client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::ParseError(e.to_string())
        } else {
            ClientError::NetworkError(e.to_string())
        }
    }
}

/// Search endpoint response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchCandidate>,
}

/// Work or edition detail response
#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    description: Option<DescriptionField>,
}

/// Descriptions arrive either as a plain string or as `{"type": .., "value": ..}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionField {
    Text(String),
    Typed { value: String },
}

impl DescriptionField {
    fn into_text(self) -> String {
        match self {
            DescriptionField::Text(text) => text,
            DescriptionField::Typed { value } => value,
        }
    }
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
    covers_base_url: String,
}

impl OpenLibraryClient {
    /// Create client against explicit endpoints
    pub fn new(
        base_url: impl Into<String>,
        covers_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            covers_base_url: covers_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from resolved service configuration
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ClientError> {
        Self::new(
            config.openlibrary_base_url.clone(),
            config.covers_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Search for documents matching title and author
    ///
    /// An absent or empty `docs` list is a valid empty result.
    pub async fn search(
        &self,
        title: &str,
        author: &str,
    ) -> Result<Vec<SearchCandidate>, ClientError> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(title = %title, author = %author, url = %url, "Querying search endpoint");

        let response = self
            .http_client
            .get(&url)
            .query(&[("title", title), ("author", author)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        tracing::debug!(
            title = %title,
            author = %author,
            results = body.docs.len(),
            "Search completed"
        );

        Ok(body.docs)
    }

    /// Fetch the raw description of a work or edition
    ///
    /// `detail_path` is a path such as `/works/OL45804W`.
    pub async fn fetch_description(&self, detail_path: &str) -> Result<Option<String>, ClientError> {
        let url = format!("{}{}.json", self.base_url, detail_path);
        tracing::debug!(url = %url, "Querying detail endpoint");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError(status.as_u16(), error_text));
        }

        let detail: DetailResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        Ok(detail.description.map(DescriptionField::into_text))
    }

    /// Large cover image URL for a cover id
    pub fn cover_url(&self, cover_id: i64) -> String {
        format!("{}/b/id/{}-L.jpg", self.covers_base_url, cover_id)
    }
}

/// Detail endpoint path for a candidate
///
/// Prefers the work key; falls back to the first edition key.
pub fn detail_path(candidate: &SearchCandidate) -> Option<String> {
    if let Some(key) = candidate.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        let id = key.trim_start_matches('/').trim_start_matches("works/");
        return Some(format!("/works/{}", id));
    }

    candidate
        .edition_key
        .iter()
        .map(|k| k.trim())
        .find(|k| !k.is_empty())
        .map(|id| format!("/books/{}", id))
}
