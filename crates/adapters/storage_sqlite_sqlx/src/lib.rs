//! # estatefeed-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `ListingRepository` port defined in `estatefeed-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `estatefeed-app` (for port traits) and `estatefeed-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod listing_repo;
mod pool;

pub use error::StorageError;
pub use listing_repo::SqliteListingRepository;
pub use pool::{Config, Database};
