//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod listings;
#[allow(clippy::missing_errors_doc)]
pub mod sessions;
#[allow(clippy::missing_errors_doc)]
pub mod stream;

use axum::Router;
use axum::routing::{get, post, put};

use estatefeed_app::ports::ListingRepository;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: ListingRepository + Send + Sync + 'static,
{
    Router::new()
        // Listings
        .route(
            "/listings",
            get(listings::list::<R>).post(listings::create::<R>),
        )
        .route("/listings/latest", get(listings::latest::<R>))
        .route("/listings/{id}", get(listings::get::<R>))
        // Feed sessions
        .route("/feed/sessions", post(sessions::open::<R>))
        .route(
            "/feed/sessions/{id}",
            get(sessions::get::<R>).delete(sessions::close::<R>),
        )
        .route(
            "/feed/sessions/{id}/params",
            put(sessions::change_parameters::<R>),
        )
        .route("/feed/sessions/{id}/refresh", post(sessions::refresh::<R>))
        .route(
            "/feed/sessions/{id}/activate/{listing_id}",
            post(sessions::activate::<R>),
        )
        .route("/feed/sessions/{id}/stream", get(stream::stream::<R>))
}
