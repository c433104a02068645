//! HTTP routing integration tests
//!
//! Exercise the router through `tower::ServiceExt::oneshot` with an in-memory
//! store. No seeds are configured unless a test needs reconciliation.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use helpers::{catalog_for, memory_store, UNREACHABLE_BASE};
use http_body_util::BodyExt;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use shelf_catalog::{build_router, AppState};
use shelf_common::BookSeed;
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app(base_url: &str, seeds: Vec<BookSeed>) -> Router {
    let store = memory_store().await;
    let catalog = catalog_for(store, base_url, seeds);
    build_router(AppState::new(Arc::new(catalog)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shelf-catalog");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn add_then_list_and_get() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;

    let (status, created) = send(
        &app,
        "POST",
        "/add",
        Some(json!({
            "title": "Test Book",
            "author": "Test Author",
            "publication_year": 2023,
            "description": "This is a test book"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Test Book");
    assert_eq!(created["description"], "This is a test book");
    assert_eq!(created["cover_image"], "Cover image not available");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    for uri in ["/", "/books"] {
        let (status, listing) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["books"], json!([created.clone()]));
        assert_eq!(listing["failures"], json!([]));
    }
}

#[tokio::test]
async fn add_requires_title_and_author() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;

    let (status, body) = send(&app, "POST", "/add", Some(json!({"title": "Only Title"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(
        &app,
        "POST",
        "/add",
        Some(json!({"title": "   ", "author": "Someone"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_duplicate_is_conflict() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;
    let book = json!({"title": "Emma", "author": "Jane Austen"});

    let (status, _) = send(&app, "POST", "/add", Some(book.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/add", Some(book)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn edit_and_delete_lifecycle() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;

    let (_, created) = send(
        &app,
        "POST",
        "/add",
        Some(json!({"title": "Test Book", "author": "Test Author"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, edited) = send(
        &app,
        "POST",
        &format!("/edit/{}", id),
        Some(json!({
            "title": "Edited Test Book",
            "author": "Edited Test Author",
            "publication_year": 2024,
            "description": "Updated description",
            "cover_image": "https://example.com/updated-test-book.jpg"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["id"], id);
    assert_eq!(edited["title"], "Edited Test Book");
    assert_eq!(edited["cover_image"], "https://example.com/updated-test-book.jpg");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/edit/{}", id),
        Some(json!({"title": "", "author": "Edited Test Author"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, deleted) = send(&app, "POST", &format!("/delete/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, edited);

    let (status, body) = send(&app, "GET", &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = test_app(UNREACHABLE_BASE, Vec::new()).await;

    let (status, _) = send(
        &app,
        "POST",
        "/edit/999",
        Some(json!({"title": "Ghost", "author": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/delete/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_reports_failed_seeds() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"docs": []}"#)
        .create_async()
        .await;

    let app = test_app(
        &server.url(),
        vec![BookSeed::new("Nonexistent Book", "Nobody")],
    )
    .await;

    let (status, listing) = send(&app, "GET", "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["books"], json!([]));
    assert_eq!(
        listing["failures"],
        json!([{"title": "Nonexistent Book", "author": "Nobody", "error": "Not found"}])
    );
}
