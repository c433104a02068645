//! Book persistence
//!
//! `BookStore` is the capability the reconciliation pipeline and the route
//! layer are handed; `SqliteBookStore` is the production implementation.
//!
//! Placeholders are stored as their sentinel strings. Title and author are
//! trimmed on every write and compared case-insensitively by the schema.
//!
//! The non-regression merge of `upsert` runs inside one
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so concurrent reconciliations
//! of the same (title, author) are serialized by SQLite and can never replace
//! a real value with a placeholder.

use async_trait::async_trait;
use shelf_common::models::{from_stored, to_stored, COVER_NOT_AVAILABLE, DESCRIPTION_NOT_AVAILABLE};
use shelf_common::{BookDraft, BookRecord, Error, Result};
use sqlx::SqlitePool;

/// Persisted book store
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Find a book by case-insensitive (title, author)
    async fn find_by_title_author(&self, title: &str, author: &str) -> Result<Option<BookRecord>>;

    /// All books in creation order
    async fn find_all(&self) -> Result<Vec<BookRecord>>;

    /// Insert, or merge into the existing (title, author) row without regressing
    ///
    /// Description and cover are replaced only when the incoming value is real
    /// or the stored value is a placeholder. A missing publication year is filled.
    async fn upsert(&self, draft: &BookDraft) -> Result<BookRecord>;

    async fn find_by_id(&self, id: i64) -> Result<Option<BookRecord>>;

    /// Insert a new book; `Error::Conflict` if (title, author) exists
    async fn insert(&self, draft: &BookDraft) -> Result<BookRecord>;

    /// Overwrite every field of a book; `None` if the id is unknown
    async fn update_by_id(&self, id: i64, draft: &BookDraft) -> Result<Option<BookRecord>>;

    /// Delete a book, returning the removed row; `None` if the id is unknown
    async fn delete_by_id(&self, id: i64) -> Result<Option<BookRecord>>;
}

/// Raw `books` row
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    publication_year: Option<i32>,
    description: Option<String>,
    cover_image: Option<String>,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        BookRecord {
            id: row.id,
            title: row.title,
            author: row.author,
            publication_year: row.publication_year,
            description: from_stored(row.description, DESCRIPTION_NOT_AVAILABLE),
            cover_image: from_stored(row.cover_image, COVER_NOT_AVAILABLE),
        }
    }
}

const BOOK_COLUMNS: &str = "id, title, author, publication_year, description, cover_image";

/// SQLite-backed book store
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations to `Error::Conflict`
fn conflict_or_database(e: sqlx::Error, draft: &BookDraft) -> Error {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Error::Conflict(format!(
            "Book '{}' by '{}' already exists",
            draft.title, draft.author
        )),
        _ => Error::Database(e),
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn find_by_title_author(&self, title: &str, author: &str) -> Result<Option<BookRecord>> {
        let query = format!(
            "SELECT {} FROM books WHERE title = ? AND author = ?",
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(title.trim())
            .bind(author.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BookRecord::from))
    }

    async fn find_all(&self) -> Result<Vec<BookRecord>> {
        let query = format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS);

        let rows = sqlx::query_as::<_, BookRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }

    async fn upsert(&self, draft: &BookDraft) -> Result<BookRecord> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, publication_year, description, cover_image)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(title, author) DO UPDATE SET
                publication_year = COALESCE(books.publication_year, excluded.publication_year),
                description = CASE
                    WHEN excluded.description <> ?6
                        OR books.description IS NULL
                        OR trim(books.description) = ''
                        OR books.description = ?6
                    THEN excluded.description
                    ELSE books.description
                END,
                cover_image = CASE
                    WHEN excluded.cover_image <> ?7
                        OR books.cover_image IS NULL
                        OR trim(books.cover_image) = ''
                        OR books.cover_image = ?7
                    THEN excluded.cover_image
                    ELSE books.cover_image
                END,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(draft.title.trim())
            .bind(draft.author.trim())
            .bind(draft.publication_year)
            .bind(to_stored(draft.description.as_deref(), DESCRIPTION_NOT_AVAILABLE))
            .bind(to_stored(draft.cover_image.as_deref(), COVER_NOT_AVAILABLE))
            .bind(DESCRIPTION_NOT_AVAILABLE)
            .bind(COVER_NOT_AVAILABLE)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            id = row.id,
            title = %row.title,
            author = %row.author,
            "Upserted book"
        );

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BookRecord>> {
        let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BookRecord::from))
    }

    async fn insert(&self, draft: &BookDraft) -> Result<BookRecord> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, publication_year, description, cover_image)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(draft.title.trim())
            .bind(draft.author.trim())
            .bind(draft.publication_year)
            .bind(to_stored(draft.description.as_deref(), DESCRIPTION_NOT_AVAILABLE))
            .bind(to_stored(draft.cover_image.as_deref(), COVER_NOT_AVAILABLE))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_database(e, draft))?;

        Ok(row.into())
    }

    async fn update_by_id(&self, id: i64, draft: &BookDraft) -> Result<Option<BookRecord>> {
        let query = format!(
            r#"
            UPDATE books
            SET
                title = ?,
                author = ?,
                publication_year = ?,
                description = ?,
                cover_image = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(draft.title.trim())
            .bind(draft.author.trim())
            .bind(draft.publication_year)
            .bind(to_stored(draft.description.as_deref(), DESCRIPTION_NOT_AVAILABLE))
            .bind(to_stored(draft.cover_image.as_deref(), COVER_NOT_AVAILABLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or_database(e, draft))?;

        Ok(row.map(BookRecord::from))
    }

    async fn delete_by_id(&self, id: i64) -> Result<Option<BookRecord>> {
        let query = format!("DELETE FROM books WHERE id = ? RETURNING {}", BOOK_COLUMNS);

        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BookRecord::from))
    }
}
