//! shelf-catalog library interface
//!
//! Exposes the enrichment pipeline, the book store and the HTTP router for the
//! binary and for integration tests.

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::Catalog;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog orchestrator (store, reconciler and seeds)
    pub catalog: Arc<Catalog>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::book_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
