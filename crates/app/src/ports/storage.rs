//! Storage port — repository trait for listing persistence and queries.

use std::future::Future;

use estatefeed_domain::error::EstateFeedError;
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::ListingSummary;
use estatefeed_domain::search::ListingQuery;

/// Persists listings and answers the two feed queries.
pub trait ListingRepository {
    /// Store a new listing.
    fn create(
        &self,
        listing: ListingSummary,
    ) -> impl Future<Output = Result<ListingSummary, EstateFeedError>> + Send;

    /// Look up a single listing.
    fn get_by_id(
        &self,
        id: ListingId,
    ) -> impl Future<Output = Result<Option<ListingSummary>, EstateFeedError>> + Send;

    /// Newest listings first, at most `limit`.
    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send;

    /// Listings matching `query`, newest first.
    ///
    /// The text part matches as a substring of name, address, or property
    /// type, ignoring the case of ASCII letters only: `"MALIBU"` finds
    /// `"Malibu"` but `"étoile"` does not find `"Étoile"`. The filter
    /// restricts the property type.
    fn search(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send;
}

impl<T: ListingRepository + Send + Sync> ListingRepository for std::sync::Arc<T> {
    fn create(
        &self,
        listing: ListingSummary,
    ) -> impl Future<Output = Result<ListingSummary, EstateFeedError>> + Send {
        (**self).create(listing)
    }

    fn get_by_id(
        &self,
        id: ListingId,
    ) -> impl Future<Output = Result<Option<ListingSummary>, EstateFeedError>> + Send {
        (**self).get_by_id(id)
    }

    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
        (**self).latest(limit)
    }

    fn search(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
        (**self).search(query)
    }
}
