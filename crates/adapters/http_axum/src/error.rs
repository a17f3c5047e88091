//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use estatefeed_domain::error::{EstateFeedError, NotFoundError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps failures to an HTTP response with an appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(EstateFeedError),
    /// The server refuses new work until resources free up.
    Unavailable(&'static str),
}

impl From<EstateFeedError> for ApiError {
    fn from(err: EstateFeedError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(EstateFeedError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(EstateFeedError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(EstateFeedError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Unavailable(reason) => (StatusCode::SERVICE_UNAVAILABLE, (*reason).to_string()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
