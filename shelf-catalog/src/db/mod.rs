//! Database access for shelf-catalog

pub mod books;

pub use books::{BookStore, SqliteBookStore};
