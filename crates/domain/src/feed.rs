//! Feed snapshot and its projection into presentational sections.
//!
//! The projection is declarative: each section is derived from its own
//! [`FetchState`] with the same policy, so the featured carousel and the
//! recommendations grid never influence each other.

use serde::{Deserialize, Serialize};

use crate::fetch::FetchState;
use crate::greeting::Greeting;
use crate::id::ListingId;
use crate::listing::{ListingSummary, PropertyType};
use crate::search::{ALL_FILTER, SearchParameters};

/// Committed state of a feed controller at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Last observed search parameters; `None` until the first change.
    pub params: Option<SearchParameters>,
    /// Latest listings feeding the featured carousel.
    pub latest: FetchState<ListingSummary>,
    /// Parameter-dependent listings feeding the recommendations grid.
    pub filtered: FetchState<ListingSummary>,
}

impl FeedSnapshot {
    /// `true` once neither request is in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.latest.loading() && !self.filtered.loading()
    }
}

/// What a feed section shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum SectionView<T> {
    /// A request is running and nothing is loaded yet.
    Loading,
    /// The last request failed.
    Failed(String),
    /// Nothing to show; rendered as the empty-state placeholder.
    Empty,
    Items(Vec<T>),
}

impl<T> SectionView<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }
}

impl SectionView<Card> {
    /// Apply the rendering policy to one fetch slot.
    #[must_use]
    pub fn project(state: &FetchState<ListingSummary>) -> Self {
        if state.loading() && !state.has_data() {
            return Self::Loading;
        }
        if let Some(error) = &state.error {
            return Self::Failed(error.clone());
        }
        if !state.has_data() {
            return Self::Empty;
        }
        Self::Items(state.items().iter().map(Card::from).collect())
    }
}

/// Card rendered for one listing, wired to its detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: ListingId,
    pub name: String,
    pub address: String,
    pub property_type: PropertyType,
    pub price: u64,
    pub rating: f32,
    pub image_url: Option<String>,
    pub detail_path: String,
}

impl From<&ListingSummary> for Card {
    fn from(listing: &ListingSummary) -> Self {
        Self {
            id: listing.id.clone(),
            name: listing.name.clone(),
            address: listing.address.clone(),
            property_type: listing.property_type,
            price: listing.price,
            rating: listing.rating,
            image_url: listing.image_url.clone(),
            detail_path: listing.detail_path(),
        }
    }
}

/// One chip of the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub label: &'static str,
    pub active: bool,
}

/// Everything the home feed screen displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    pub greeting: Greeting,
    pub viewer: Option<String>,
    /// Current search text, for the search box.
    pub query: String,
    pub filters: Vec<FilterChip>,
    pub featured: SectionView<Card>,
    pub recommendations: SectionView<Card>,
}

impl FeedView {
    /// Project a snapshot for display at the given wall-clock `hour`.
    #[must_use]
    pub fn project(snapshot: &FeedSnapshot, hour: u32, viewer: Option<String>) -> Self {
        let params = snapshot.params.clone().unwrap_or_default();
        let active = params.active_filter();
        let filters = std::iter::once(ALL_FILTER)
            .chain(PropertyType::ALL.into_iter().map(PropertyType::as_str))
            .map(|label| FilterChip {
                label,
                active: label == active,
            })
            .collect();

        Self {
            greeting: Greeting::for_hour(hour),
            viewer,
            query: params.query.unwrap_or_default(),
            filters,
            featured: SectionView::project(&snapshot.latest),
            recommendations: SectionView::project(&snapshot.filtered),
        }
    }
}
