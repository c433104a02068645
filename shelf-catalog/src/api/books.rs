//! Book catalog endpoints
//!
//! - `GET /`, `GET /books`: full catalog, reconciling missing seeds first
//! - `GET /books/:id`: one book
//! - `POST /add`, `POST /edit/:id`, `POST /delete/:id`: manual maintenance

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shelf_common::{BookDraft, BookRecord};
use tracing::info;

use crate::error::ApiResult;
use crate::services::CatalogSnapshot;
use crate::AppState;

/// GET / and GET /books
///
/// Returns `{"books": [...], "failures": [...]}`. Failures list only the seeds
/// that could not be enriched during this request.
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<CatalogSnapshot>> {
    let snapshot = state.catalog.refresh().await?;
    Ok(Json(snapshot))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookRecord>> {
    Ok(Json(state.catalog.get(id).await?))
}

/// POST /add
pub async fn add_book(
    State(state): State<AppState>,
    Json(draft): Json<BookDraft>,
) -> ApiResult<(StatusCode, Json<BookRecord>)> {
    info!(title = %draft.title, author = %draft.author, "Add book request");
    let record = state.catalog.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /edit/:id
pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<BookDraft>,
) -> ApiResult<Json<BookRecord>> {
    info!(id, title = %draft.title, "Edit book request");
    Ok(Json(state.catalog.update(id, &draft).await?))
}

/// POST /delete/:id
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookRecord>> {
    info!(id, "Delete book request");
    Ok(Json(state.catalog.delete(id).await?))
}

/// Build book catalog routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books))
        .route("/books", get(list_books))
        .route("/books/:id", get(get_book))
        .route("/add", post(add_book))
        .route("/edit/:id", post(edit_book))
        .route("/delete/:id", post(delete_book))
}
