//! Listing detail page, the target of card activation.

use std::str::FromStr;

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::id::ListingId;

use super::{DashboardError, format_price, format_rating, render};
use crate::state::AppState;

/// Listing detail template.
#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    name: String,
    address: String,
    kind: &'static str,
    price: String,
    rating: String,
    image_url: Option<String>,
    listed_on: String,
}

impl IntoResponse for ListingTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// `GET /properties/{id}`
pub async fn detail<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ListingTemplate, DashboardError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let id = ListingId::from_str(&id)?;
    let listing = state.listing_service.get_listing(id).await?;

    Ok(ListingTemplate {
        kind: listing.property_type.as_str(),
        price: format_price(listing.price),
        rating: format_rating(listing.rating),
        listed_on: listing.created_at.format("%Y-%m-%d").to_string(),
        name: listing.name,
        address: listing.address,
        image_url: listing.image_url,
    })
}
