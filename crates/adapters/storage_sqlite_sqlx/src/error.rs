//! Storage-specific error type wrapping sqlx errors.

use estatefeed_domain::error::EstateFeedError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A value does not fit the column type.
    #[error("value out of range for column {0}")]
    OutOfRange(&'static str),
}

impl From<StorageError> for EstateFeedError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
