//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`EstateFeedError`] via `#[from]`.

/// Top-level error shared by the domain, application, and adapter layers.
#[derive(Debug, thiserror::Error)]
pub enum EstateFeedError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Opaque failure raised by a persistence adapter.
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("identifier {0:?} may only contain ASCII letters, digits, '-' and '_'")]
    InvalidId(String),

    #[error("name must not be empty")]
    EmptyName,

    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(String),

    #[error("unknown property type {0:?}")]
    UnknownPropertyType(String),

    #[error("limit must be greater than zero")]
    ZeroLimit,
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
