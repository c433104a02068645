//! Catalog orchestration
//!
//! Runs the reconciler over the configured seeds that the store does not hold
//! yet, then returns the whole store. Also hosts the manual CRUD operations
//! exposed by the route layer.

use crate::db::BookStore;
use crate::services::reconciler::Reconciler;
use crate::types::FailedSeed;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use shelf_common::models::fold_key;
use shelf_common::{BookDraft, BookRecord, BookSeed, Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Store contents after a refresh, with this pass's failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    pub books: Vec<BookRecord>,
    pub failures: Vec<FailedSeed>,
}

/// Catalog orchestrator
pub struct Catalog {
    store: Arc<dyn BookStore>,
    reconciler: Reconciler,
    seeds: Vec<BookSeed>,
    max_concurrent: usize,
}

impl Catalog {
    pub fn new(
        store: Arc<dyn BookStore>,
        reconciler: Reconciler,
        seeds: Vec<BookSeed>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            store,
            reconciler,
            seeds,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn seeds(&self) -> &[BookSeed] {
        &self.seeds
    }

    /// Seeds whose case-folded title is not present in `books`
    fn missing_seeds(&self, books: &[BookRecord]) -> Vec<BookSeed> {
        let present: HashSet<String> = books.iter().map(|b| fold_key(&b.title)).collect();
        self.seeds
            .iter()
            .filter(|seed| !present.contains(&fold_key(&seed.title)))
            .cloned()
            .collect()
    }

    /// Reconcile missing seeds and return the full catalog
    ///
    /// Reconciliations run concurrently up to `max_concurrent`; one failing seed
    /// never affects the others. Books come back in id order.
    pub async fn refresh(&self) -> Result<CatalogSnapshot> {
        let existing = self.store.find_all().await?;
        let missing = self.missing_seeds(&existing);

        if missing.is_empty() {
            debug!(books = existing.len(), "All seeds present, no enrichment needed");
            return Ok(CatalogSnapshot {
                books: existing,
                failures: Vec::new(),
            });
        }

        info!(
            missing = missing.len(),
            seeds = self.seeds.len(),
            max_concurrent = self.max_concurrent,
            "Reconciling missing seeds"
        );

        let outcomes: Vec<_> = stream::iter(missing)
            .map(|seed| {
                let reconciler = self.reconciler.clone();
                async move { reconciler.reconcile(&seed).await }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let failures: Vec<FailedSeed> = outcomes
            .iter()
            .filter_map(|outcome| outcome.failure().cloned())
            .collect();

        let books = self.store.find_all().await?;

        info!(
            books = books.len(),
            reconciled = outcomes.len() - failures.len(),
            failed = failures.len(),
            "Catalog refresh complete"
        );

        Ok(CatalogSnapshot { books, failures })
    }

    pub async fn get(&self, id: i64) -> Result<BookRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book from user input
    ///
    /// # Errors
    /// `InvalidInput` without title or author, `Conflict` if the pair exists.
    pub async fn create(&self, draft: &BookDraft) -> Result<BookRecord> {
        draft.validate()?;
        let record = self.store.insert(draft).await?;
        info!(id = record.id, title = %record.title, "Book created");
        Ok(record)
    }

    /// Replace every field of an existing book
    pub async fn update(&self, id: i64, draft: &BookDraft) -> Result<BookRecord> {
        draft.validate()?;
        let record = self
            .store
            .update_by_id(id, draft)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Book {} not found", id)))?;
        info!(id = record.id, title = %record.title, "Book updated");
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<BookRecord> {
        let record = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Book {} not found", id)))?;
        info!(id = record.id, title = %record.title, "Book deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteBookStore;
    use crate::services::metadata_fetcher::MetadataFetcher;
    use crate::services::openlibrary_client::OpenLibraryClient;
    use shelf_common::db::init_memory_database;
    use std::time::Duration;

    async fn catalog_with(seeds: Vec<BookSeed>) -> Catalog {
        let pool = init_memory_database().await.unwrap();
        let store: Arc<dyn BookStore> = Arc::new(SqliteBookStore::new(pool));
        // Unroutable endpoint: any fetch fails fast
        let client = OpenLibraryClient::new(
            "http://127.0.0.1:9",
            "https://covers.example.org",
            Duration::from_secs(2),
        )
        .unwrap();
        let reconciler = Reconciler::new(store.clone(), Arc::new(MetadataFetcher::new(client)));
        Catalog::new(store, reconciler, seeds, 4)
    }

    #[tokio::test]
    async fn test_missing_seeds_by_folded_title() {
        let catalog = catalog_with(vec![
            BookSeed::new("Dune", "Frank Herbert"),
            BookSeed::new("Emma", "Jane Austen"),
        ])
        .await;
        let books = vec![BookRecord {
            id: 1,
            title: "  DUNE".to_string(),
            author: "Someone Else".to_string(),
            publication_year: None,
            description: None,
            cover_image: None,
        }];

        let missing = catalog.missing_seeds(&books);
        assert_eq!(missing, vec![BookSeed::new("Emma", "Jane Austen")]);
    }

    #[tokio::test]
    async fn test_refresh_reports_failures_and_continues() {
        let catalog = catalog_with(vec![
            BookSeed::new("Dune", "Frank Herbert"),
            BookSeed::new("Emma", "Jane Austen"),
        ])
        .await;

        let snapshot = catalog.refresh().await.unwrap();

        assert!(snapshot.books.is_empty());
        assert_eq!(snapshot.failures.len(), 2);
        assert!(snapshot
            .failures
            .iter()
            .all(|f| f.error == crate::types::FetchFailure::UpstreamRequestFailed));
    }

    #[tokio::test]
    async fn test_refresh_runs_on_spawned_task() {
        let catalog = Arc::new(catalog_with(vec![BookSeed::new("Dune", "Frank Herbert")]).await);

        let snapshot = tokio::spawn(async move { catalog.refresh().await })
            .await
            .expect("Task panicked")
            .unwrap();

        assert_eq!(snapshot.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let catalog = catalog_with(Vec::new()).await;

        let invalid = BookDraft::placeholder("", "Author");
        assert!(matches!(
            catalog.create(&invalid).await,
            Err(Error::InvalidInput(_))
        ));

        let created = catalog
            .create(&BookDraft::placeholder("Emma", "Jane Austen"))
            .await
            .unwrap();
        assert!(matches!(
            catalog.create(&BookDraft::placeholder("Emma", "Jane Austen")).await,
            Err(Error::Conflict(_))
        ));

        let mut edit = BookDraft::placeholder("Emma", "Jane Austen");
        edit.publication_year = Some(1815);
        let updated = catalog.update(created.id, &edit).await.unwrap();
        assert_eq!(updated.publication_year, Some(1815));
        assert_eq!(catalog.get(created.id).await.unwrap(), updated);

        assert_eq!(catalog.delete(created.id).await.unwrap(), updated);
        assert!(matches!(catalog.get(created.id).await, Err(Error::NotFound(_))));
        assert!(matches!(catalog.delete(created.id).await, Err(Error::NotFound(_))));
        assert!(matches!(
            catalog.update(created.id, &edit).await,
            Err(Error::NotFound(_))
        ));
    }
}
