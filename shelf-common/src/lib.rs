//! # Shelf Common Library
//!
//! Shared code for the shelf catalog service:
//! - Book models and the placeholder (sentinel) conventions of the `books` table
//! - Database bootstrap (pool creation, schema)
//! - Configuration loading
//! - Error types

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{BookDraft, BookRecord, BookSeed};
