//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures the `books` table exists.
//! Schema creation is idempotent and runs on every startup.

use crate::models::{COVER_NOT_AVAILABLE, DESCRIPTION_NOT_AVAILABLE};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets listing reads proceed while reconciliation writes
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_books_table(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the catalog schema
///
/// Pinned to a single connection that never expires: every SQLite in-memory
/// connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_books_table(&pool).await?;

    Ok(pool)
}

/// Create the books table
///
/// Title and author use `NOCASE` collation, so the `(title, author)` unique key
/// and every comparison against it are case-insensitive (ASCII).
pub async fn create_books_table(pool: &SqlitePool) -> Result<()> {
    let create_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL COLLATE NOCASE,
            author TEXT NOT NULL COLLATE NOCASE,
            publication_year INTEGER,
            description TEXT NOT NULL DEFAULT '{}',
            cover_image TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (title, author)
        )
        "#,
        DESCRIPTION_NOT_AVAILABLE, COVER_NOT_AVAILABLE
    );

    sqlx::query(&create_table).execute(pool).await?;

    Ok(())
}
