//! Catalog enrichment services
//!
//! Pure steps (normalizer, selector, override table) sit beside the
//! I/O-bound ones (client, fetcher, reconciler, catalog orchestrator).

pub mod candidate_selector;
pub mod catalog;
pub mod metadata_fetcher;
pub mod openlibrary_client;
pub mod overrides;
pub mod reconciler;
pub mod text_normalizer;

pub use catalog::{Catalog, CatalogSnapshot};
pub use metadata_fetcher::MetadataFetcher;
pub use openlibrary_client::{ClientError, OpenLibraryClient};
pub use reconciler::{ReconcileOutcome, Reconciler};
