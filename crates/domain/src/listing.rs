//! Listing — a property summary as shown on feed cards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EstateFeedError, ValidationError};
use crate::id::ListingId;
use crate::time::{Timestamp, now};

/// Kind of property a listing advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Condo,
    Duplex,
    Studio,
    Villa,
    Apartment,
    Townhouse,
    Other,
}

impl PropertyType {
    /// Every property type, in the order the filter bar shows them.
    pub const ALL: [Self; 8] = [
        Self::House,
        Self::Condo,
        Self::Duplex,
        Self::Studio,
        Self::Villa,
        Self::Apartment,
        Self::Townhouse,
        Self::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Condo => "Condo",
            Self::Duplex => "Duplex",
            Self::Studio => "Studio",
            Self::Villa => "Villa",
            Self::Apartment => "Apartment",
            Self::Townhouse => "Townhouse",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    /// Case-insensitive; `Townhomes` and `Others` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .or_else(|| {
                if needle.eq_ignore_ascii_case("townhomes") {
                    Some(Self::Townhouse)
                } else if needle.eq_ignore_ascii_case("others") {
                    Some(Self::Other)
                } else {
                    None
                }
            })
            .ok_or_else(|| ValidationError::UnknownPropertyType(s.to_string()))
    }
}

/// A property listing summary.
///
/// The feed controller only relies on `id`; every other field is display data
/// supplied by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: ListingId,
    pub name: String,
    pub address: String,
    pub property_type: PropertyType,
    /// Asking price in whole currency units.
    pub price: u64,
    /// Average review rating, 0.0 to 5.0.
    pub rating: f32,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl ListingSummary {
    /// Create a builder for constructing a [`ListingSummary`].
    #[must_use]
    pub fn builder() -> ListingBuilder {
        ListingBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EstateFeedError::Validation`] when `name` is empty or
    /// `rating` falls outside `0.0..=5.0`.
    pub fn validate(&self) -> Result<(), EstateFeedError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating.to_string()).into());
        }
        Ok(())
    }

    /// Path of the detail view for this listing.
    #[must_use]
    pub fn detail_path(&self) -> String {
        detail_path(&self.id)
    }
}

/// Path of the detail view addressed by `id`.
#[must_use]
pub fn detail_path(id: &ListingId) -> String {
    format!("/properties/{id}")
}

/// Step-by-step builder for [`ListingSummary`].
#[derive(Debug, Default)]
pub struct ListingBuilder {
    id: Option<ListingId>,
    name: Option<String>,
    address: Option<String>,
    property_type: Option<PropertyType>,
    price: u64,
    rating: f32,
    image_url: Option<String>,
    created_at: Option<Timestamp>,
}

impl ListingBuilder {
    #[must_use]
    pub fn id(mut self, id: ListingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    #[must_use]
    pub fn price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`ListingSummary`].
    ///
    /// Missing ids are generated, missing timestamps default to now and a
    /// missing property type defaults to [`PropertyType::Other`].
    ///
    /// # Errors
    ///
    /// Returns [`EstateFeedError::Validation`] if `name` is missing or empty,
    /// or the rating is out of range.
    pub fn build(self) -> Result<ListingSummary, EstateFeedError> {
        let listing = ListingSummary {
            id: self.id.unwrap_or_else(ListingId::generate),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            property_type: self.property_type.unwrap_or(PropertyType::Other),
            price: self.price,
            rating: self.rating,
            image_url: self.image_url,
            created_at: self.created_at.unwrap_or_else(now),
        };
        listing.validate()?;
        Ok(listing)
    }
}
