//! Home feed page: greeting, search, filters, featured carousel, and the
//! recommendations grid.
//!
//! Every render mounts its own feed controller, hands it the query string as
//! the current search parameters, and waits up to the configured render
//! timeout for both requests to settle. A section still loading after that
//! is rendered as a spinner and the page asks the browser to reload.

use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};

use estatefeed_app::feed_controller::FeedController;
use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::feed::{Card, FeedView, SectionView};
use estatefeed_domain::id::ListingId;
use estatefeed_domain::search::SearchParameters;
use estatefeed_domain::time::local_hour;

use super::{DashboardError, format_price, format_rating, render};
use crate::state::AppState;

/// A listing card as rendered in either section.
pub struct CardView {
    name: String,
    address: String,
    kind: &'static str,
    price: String,
    rating: String,
    image_url: Option<String>,
    href: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            address: card.address.clone(),
            kind: card.property_type.as_str(),
            price: format_price(card.price),
            rating: format_rating(card.rating),
            image_url: card.image_url.clone(),
            href: format!("/open/{}", card.id),
        }
    }
}

/// One feed section, flattened for the template.
pub struct SectionBlock {
    loading: bool,
    error: Option<String>,
    cards: Vec<CardView>,
}

impl From<&SectionView<Card>> for SectionBlock {
    fn from(section: &SectionView<Card>) -> Self {
        Self {
            loading: matches!(section, SectionView::Loading),
            error: match section {
                SectionView::Failed(message) => Some(message.clone()),
                _ => None,
            },
            cards: section.items().iter().map(CardView::from).collect(),
        }
    }
}

pub struct ChipView {
    label: &'static str,
    active: bool,
}

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    reload: bool,
    refresh_seconds: u32,
    greeting: &'static str,
    viewer: Option<String>,
    query: String,
    filters: Vec<ChipView>,
    featured: SectionBlock,
    recommendations: SectionBlock,
}

impl HomeTemplate {
    fn new(view: &FeedView, refresh_seconds: u32) -> Self {
        let featured = SectionBlock::from(&view.featured);
        let recommendations = SectionBlock::from(&view.recommendations);
        Self {
            reload: featured.loading || recommendations.loading,
            refresh_seconds,
            greeting: view.greeting.as_str(),
            viewer: view.viewer.clone(),
            query: view.query.clone(),
            filters: view
                .filters
                .iter()
                .map(|chip| ChipView {
                    label: chip.label,
                    active: chip.active,
                })
                .collect(),
            featured,
            recommendations,
        }
    }
}

impl IntoResponse for HomeTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// `GET /?query=&filter=` — the home feed.
pub async fn index<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<SearchParameters>,
) -> HomeTemplate
where
    R: ListingRepository + Send + Sync + 'static,
{
    let controller = FeedController::new(
        Arc::clone(&state.listing_service),
        Arc::clone(&state.navigator),
    );
    controller.on_mount();
    controller.on_parameters_changed(params);

    let snapshot =
        match tokio::time::timeout(state.settings.render_timeout, controller.settled()).await {
            Ok(snapshot) => snapshot,
            Err(_) => {
                tracing::debug!("feed not settled before render timeout");
                controller.snapshot()
            }
        };

    let view = FeedView::project(&snapshot, local_hour(), state.settings.viewer_name.clone());
    HomeTemplate::new(&view, state.settings.refresh_seconds)
}

/// `GET /open/{id}` — activate a card and follow the navigation request.
pub async fn open<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Redirect, DashboardError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let id = ListingId::from_str(&id)?;
    let controller = FeedController::new(
        Arc::clone(&state.listing_service),
        Arc::clone(&state.navigator),
    );
    let path = controller.on_item_activated(&id);
    Ok(Redirect::to(&path))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::router::build;
    use crate::test_support::{MemoryRepo, body_string, get, send, state_with};

    #[tokio::test]
    async fn should_render_greeting_and_both_sections() {
        let app = build(state_with(MemoryRepo::seeded()));

        let response = send(&app, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Good "));
        assert!(html.contains("Jordan"));
        assert!(html.contains("Beach Villa"));
        assert!(html.contains("Garden House"));
        assert!(html.contains("href=\"/open/city-condo\""));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[tokio::test]
    async fn should_mark_active_filter_chip() {
        let app = build(state_with(MemoryRepo::seeded()));

        let html = body_string(send(&app, get("/?filter=Condo")).await).await;
        assert!(html.contains("class=\"chip active\">Condo<"));
        assert!(html.contains("class=\"chip\">All<"));
    }

    #[tokio::test]
    async fn should_show_no_results_when_search_matches_nothing() {
        let app = build(state_with(MemoryRepo::seeded()));

        let html = body_string(send(&app, get("/?query=zzz&filter=All")).await).await;
        assert!(html.contains("No results"));
        // the carousel is independent of the search
        assert!(html.contains("Beach Villa"));
    }

    #[tokio::test]
    async fn should_render_error_state_when_backend_fails() {
        let app = build(state_with(MemoryRepo::failing()));

        let response = send(&app, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("class=\"section-error\""));
    }

    #[tokio::test]
    async fn should_escape_search_text() {
        let app = build(state_with(MemoryRepo::seeded()));

        let html = body_string(send(&app, get("/?query=%3Cscript%3E")).await).await;
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn should_redirect_activation_to_detail_page() {
        let app = build(state_with(MemoryRepo::seeded()));

        let response = send(&app, get("/open/beach-villa")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/properties/beach-villa");
    }

    #[tokio::test]
    async fn should_refuse_activation_of_id_with_encoded_separator() {
        let app = build(state_with(MemoryRepo::seeded()));

        let response = send(&app, get("/open/a%2Fb")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!response.headers().contains_key("location"));
    }
}
