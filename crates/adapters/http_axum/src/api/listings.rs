//! JSON REST handlers for listings.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::{ListingSummary, PropertyType};
use estatefeed_domain::search::{FEED_PAGE_LIMIT, SearchParameters};

use crate::error::ApiError;
use crate::state::AppState;

/// Largest page a client may request.
const MAX_PAGE_LIMIT: usize = 50;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub filter: Option<String>,
    pub limit: Option<usize>,
}

/// Request body for creating a listing.
#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub property_type: String,
    pub price: u64,
    #[serde(default)]
    pub rating: f32,
    pub image_url: Option<String>,
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<ListingSummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ListingSummary>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ListingSummary>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/listings?query=&filter=&limit=`
///
/// Same matching rules as the recommendations grid of the home feed.
pub async fn list<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let limit = params
        .limit
        .unwrap_or(FEED_PAGE_LIMIT)
        .min(MAX_PAGE_LIMIT);
    let query = SearchParameters::new(params.query, params.filter).to_query(limit);
    let listings = state.listing_service.search_listings(query).await?;
    Ok(ListResponse::Ok(Json(listings)))
}

/// `GET /api/listings/latest`
pub async fn latest<R>(State(state): State<AppState<R>>) -> Result<ListResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let listings = state.listing_service.latest_listings().await?;
    Ok(ListResponse::Ok(Json(listings)))
}

/// `GET /api/listings/{id}`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let id = ListingId::from_str(&id)?;
    let listing = state.listing_service.get_listing(id).await?;
    Ok(GetResponse::Ok(Json(listing)))
}

/// `POST /api/listings`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    Json(req): Json<CreateListingRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let property_type = PropertyType::from_str(&req.property_type)?;

    let mut builder = ListingSummary::builder()
        .name(req.name)
        .address(req.address)
        .property_type(property_type)
        .price(req.price)
        .rating(req.rating);
    if let Some(id) = req.id {
        builder = builder.id(ListingId::try_from(id)?);
    }
    if let Some(image_url) = req.image_url {
        builder = builder.image_url(image_url);
    }

    let listing = builder.build()?;
    let created = state.listing_service.create_listing(listing).await?;
    Ok(CreateResponse::Created(Json(created)))
}
