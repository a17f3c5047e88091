//! Server-side rendered HTML pages (no JavaScript).

pub mod home;
#[allow(clippy::missing_errors_doc)]
pub mod listing;

use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::error::{EstateFeedError, ValidationError};

use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: ListingRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<R>))
        .route("/open/{id}", get(home::open::<R>))
        .route("/properties/{id}", get(listing::detail::<R>))
}

/// Failure while producing an HTML page.
#[derive(Debug)]
pub enum DashboardError {
    Domain(EstateFeedError),
    Render(askama::Error),
}

impl From<EstateFeedError> for DashboardError {
    fn from(err: EstateFeedError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for DashboardError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<askama::Error> for DashboardError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err)
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    title: &'static str,
    message: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(EstateFeedError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(EstateFeedError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(EstateFeedError::Storage(err)) => {
                tracing::error!(error = %err, "storage error while rendering page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                )
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                )
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "error page rendering failed");
                status.into_response()
            }
        }
    }
}

/// Render `template` into an HTML response.
pub(crate) fn render(template: &impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => DashboardError::from(err).into_response(),
    }
}

/// `1250000` → `$1,250,000`.
pub(crate) fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub(crate) fn format_rating(rating: f32) -> String {
    format!("{rating:.1}")
}
