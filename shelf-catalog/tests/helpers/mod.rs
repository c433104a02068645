//! Test helper utilities
//!
//! Shared builders for shelf-catalog integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use shelf_catalog::db::{BookStore, SqliteBookStore};
use shelf_catalog::services::{Catalog, MetadataFetcher, OpenLibraryClient, Reconciler};
use shelf_common::db::init_memory_database;
use shelf_common::{BookDraft, BookRecord, BookSeed, Error, Result};
use std::sync::Arc;
use std::time::Duration;

pub const COVERS_BASE: &str = "https://covers.example.org";

/// Endpoint nothing listens on; any request fails fast
pub const UNREACHABLE_BASE: &str = "http://127.0.0.1:9";

/// In-memory SQLite store with the catalog schema
pub async fn memory_store() -> Arc<SqliteBookStore> {
    let pool = init_memory_database()
        .await
        .expect("Failed to create in-memory database");
    Arc::new(SqliteBookStore::new(pool))
}

/// Fetcher against a mock (or unreachable) bibliographic API
pub fn fetcher_for(base_url: &str) -> Arc<MetadataFetcher> {
    let client = OpenLibraryClient::new(base_url, COVERS_BASE, Duration::from_secs(5))
        .expect("client should build");
    Arc::new(MetadataFetcher::new(client))
}

/// Catalog over `store` with the given seeds
pub fn catalog_for(store: Arc<dyn BookStore>, base_url: &str, seeds: Vec<BookSeed>) -> Catalog {
    let reconciler = Reconciler::new(store.clone(), fetcher_for(base_url));
    Catalog::new(store, reconciler, seeds, 4)
}

/// Fully enriched "Test Book" draft
pub fn test_book() -> BookDraft {
    BookDraft {
        title: "Test Book".to_string(),
        author: "Test Author".to_string(),
        publication_year: Some(2023),
        description: Some("This is a test book".to_string()),
        cover_image: Some("https://example.com/test-book.jpg".to_string()),
    }
}

/// Store whose every operation fails except `find_all`
pub struct FailingStore;

#[async_trait]
impl BookStore for FailingStore {
    async fn find_by_title_author(&self, _title: &str, _author: &str) -> Result<Option<BookRecord>> {
        Err(Error::Internal("lookup unavailable".to_string()))
    }

    async fn find_all(&self) -> Result<Vec<BookRecord>> {
        Ok(Vec::new())
    }

    async fn upsert(&self, _draft: &BookDraft) -> Result<BookRecord> {
        Err(Error::Internal("disk full".to_string()))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<BookRecord>> {
        Err(Error::Internal("store unavailable".to_string()))
    }

    async fn insert(&self, _draft: &BookDraft) -> Result<BookRecord> {
        Err(Error::Internal("store unavailable".to_string()))
    }

    async fn update_by_id(&self, _id: i64, _draft: &BookDraft) -> Result<Option<BookRecord>> {
        Err(Error::Internal("store unavailable".to_string()))
    }

    async fn delete_by_id(&self, _id: i64) -> Result<Option<BookRecord>> {
        Err(Error::Internal("store unavailable".to_string()))
    }
}
