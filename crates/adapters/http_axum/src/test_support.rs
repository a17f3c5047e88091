//! In-memory repository and request helpers shared by the handler tests.

use std::sync::Mutex;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chrono::TimeDelta;
use http_body_util::BodyExt;
use tower::ServiceExt;

use estatefeed_app::ports::ListingRepository;
use estatefeed_app::services::listing_service::ListingService;
use estatefeed_domain::error::EstateFeedError;
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::{ListingSummary, PropertyType};
use estatefeed_domain::search::ListingQuery;
use estatefeed_domain::time::now;

use crate::state::{AppState, FeedSettings};

#[derive(Default)]
pub struct MemoryRepo {
    listings: Mutex<Vec<ListingSummary>>,
    fail: bool,
}

impl MemoryRepo {
    pub fn seeded() -> Self {
        let base = now();
        let seed = [
            ("beach-villa", "Beach Villa", "1 Ocean Drive", PropertyType::Villa),
            ("city-condo", "City Condo", "22 Main Street", PropertyType::Condo),
            ("garden-house", "Garden House", "5 Elm Road", PropertyType::House),
        ];
        let listings = seed
            .into_iter()
            .enumerate()
            .map(|(age, (id, name, address, kind))| {
                ListingSummary::builder()
                    .id(id.parse().unwrap())
                    .name(name)
                    .address(address)
                    .property_type(kind)
                    .price(100_000)
                    .rating(4.5)
                    .created_at(base - TimeDelta::minutes(i64::try_from(age).unwrap()))
                    .build()
                    .unwrap()
            })
            .collect();
        Self {
            listings: Mutex::new(listings),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            listings: Mutex::default(),
            fail: true,
        }
    }

    fn check(&self) -> Result<(), EstateFeedError> {
        if self.fail {
            return Err(EstateFeedError::Storage("backend offline".into()));
        }
        Ok(())
    }
}

impl ListingRepository for MemoryRepo {
    async fn create(&self, listing: ListingSummary) -> Result<ListingSummary, EstateFeedError> {
        self.check()?;
        self.listings.lock().unwrap().push(listing.clone());
        Ok(listing)
    }

    async fn get_by_id(&self, id: ListingId) -> Result<Option<ListingSummary>, EstateFeedError> {
        self.check()?;
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<ListingSummary>, EstateFeedError> {
        self.check()?;
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search(&self, query: ListingQuery) -> Result<Vec<ListingSummary>, EstateFeedError> {
        self.check()?;
        let needle = query.query.map(|q| q.to_ascii_lowercase());
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| query.filter.is_none_or(|kind| l.property_type == kind))
            .filter(|l| {
                needle.as_ref().is_none_or(|n| {
                    l.name.to_ascii_lowercase().contains(n)
                        || l.address.to_ascii_lowercase().contains(n)
                })
            })
            .take(query.limit)
            .cloned()
            .collect())
    }
}

pub fn state_with(repo: MemoryRepo) -> AppState<MemoryRepo> {
    let settings = FeedSettings {
        viewer_name: Some("Jordan".to_string()),
        ..FeedSettings::default()
    };
    AppState::new(ListingService::new(repo), settings)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn with_json(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
