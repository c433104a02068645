//! HTTP API handlers for shelf-catalog

pub mod books;
pub mod health;

pub use books::book_routes;
pub use health::health_routes;
