//! Search parameters and the backend listing query derived from them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::listing::PropertyType;

/// Page size of the recommended listings grid.
pub const FEED_PAGE_LIMIT: usize = 6;

/// Number of listings in the featured carousel.
pub const LATEST_LIMIT: usize = 5;

/// Label of the filter chip that removes the property-type restriction.
pub const ALL_FILTER: &str = "All";

/// Search parameters as supplied by the navigation layer.
///
/// Values are kept exactly as provided so that changes are observed field by
/// field; normalisation happens in [`SearchParameters::to_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParameters {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

impl SearchParameters {
    #[must_use]
    pub fn new(query: Option<String>, filter: Option<String>) -> Self {
        Self { query, filter }
    }

    /// Build the backend query for these parameters.
    ///
    /// A blank query means "no text match"; an absent, blank, `All`, or
    /// unrecognised filter means "any property type".
    #[must_use]
    pub fn to_query(&self, limit: usize) -> ListingQuery {
        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        ListingQuery {
            filter: self.property_type(),
            query,
            limit,
        }
    }

    /// Property type selected by the filter, if any.
    #[must_use]
    pub fn property_type(&self) -> Option<PropertyType> {
        self.filter
            .as_deref()
            .filter(|f| !f.trim().eq_ignore_ascii_case(ALL_FILTER))
            .and_then(|f| f.parse().ok())
    }

    /// Name of the active filter chip.
    #[must_use]
    pub fn active_filter(&self) -> &'static str {
        self.property_type().map_or(ALL_FILTER, PropertyType::as_str)
    }
}

/// Normalised query handed to the listing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: Option<PropertyType>,
    pub query: Option<String>,
    pub limit: usize,
}

impl ListingQuery {
    /// Check the query can be executed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroLimit`] when `limit` is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        Ok(())
    }
}
