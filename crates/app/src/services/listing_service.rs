//! Listing service — the backend query functions behind the feed.

use estatefeed_domain::error::{EstateFeedError, NotFoundError};
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::ListingSummary;
use estatefeed_domain::search::{LATEST_LIMIT, ListingQuery};

use crate::ports::ListingRepository;

/// Application service for listing queries and creation.
pub struct ListingService<R> {
    repo: R,
}

impl<R: ListingRepository> ListingService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Newest listings for the featured carousel.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn latest_listings(&self) -> Result<Vec<ListingSummary>, EstateFeedError> {
        self.repo.latest(LATEST_LIMIT).await
    }

    /// Listings matching the filter and search text, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`EstateFeedError::Validation`] for a zero limit, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn search_listings(
        &self,
        query: ListingQuery,
    ) -> Result<Vec<ListingSummary>, EstateFeedError> {
        query.validate()?;
        self.repo.search(query).await
    }

    /// Look up a listing by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`EstateFeedError::NotFound`] when no listing with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_listing(&self, id: ListingId) -> Result<ListingSummary, EstateFeedError> {
        let key = id.to_string();
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Listing",
                id: key,
            }
            .into()
        })
    }

    /// Create a new listing after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EstateFeedError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, listing), fields(listing_name = %listing.name))]
    pub async fn create_listing(
        &self,
        listing: ListingSummary,
    ) -> Result<ListingSummary, EstateFeedError> {
        listing.validate()?;
        self.repo.create(listing).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use estatefeed_domain::error::ValidationError;
    use estatefeed_domain::listing::PropertyType;
    use estatefeed_domain::search::SearchParameters;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryListingRepo {
        store: Mutex<HashMap<ListingId, ListingSummary>>,
    }

    impl InMemoryListingRepo {
        fn sorted(&self) -> Vec<ListingSummary> {
            let store = self.store.lock().unwrap();
            let mut all: Vec<ListingSummary> = store.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            all
        }
    }

    impl ListingRepository for InMemoryListingRepo {
        fn create(
            &self,
            listing: ListingSummary,
        ) -> impl Future<Output = Result<ListingSummary, EstateFeedError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(listing.id.clone(), listing.clone());
            async { Ok(listing) }
        }

        fn get_by_id(
            &self,
            id: ListingId,
        ) -> impl Future<Output = Result<Option<ListingSummary>, EstateFeedError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn latest(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
            let result: Vec<ListingSummary> = self.sorted().into_iter().take(limit).collect();
            async { Ok(result) }
        }

        fn search(
            &self,
            query: ListingQuery,
        ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
            let result: Vec<ListingSummary> = self
                .sorted()
                .into_iter()
                .filter(|l| query.filter.is_none_or(|kind| l.property_type == kind))
                .take(query.limit)
                .collect();
            async { Ok(result) }
        }
    }

    fn make_service() -> ListingService<InMemoryListingRepo> {
        ListingService::new(InMemoryListingRepo::default())
    }

    fn listing(name: &str, kind: PropertyType, minutes_ago: i64) -> ListingSummary {
        ListingSummary::builder()
            .name(name)
            .property_type(kind)
            .created_at(estatefeed_domain::time::now() - TimeDelta::minutes(minutes_ago))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_listing_when_valid() {
        let svc = make_service();
        let created = svc
            .create_listing(listing("Harbor Condo", PropertyType::Condo, 0))
            .await
            .unwrap();

        let fetched = svc.get_listing(created.id.clone()).await.unwrap();
        assert_eq!(fetched.name, "Harbor Condo");
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let svc = make_service();
        let mut invalid = listing("x", PropertyType::House, 0);
        invalid.name = String::new();

        let result = svc.create_listing(invalid).await;
        assert!(matches!(
            result,
            Err(EstateFeedError::Validation(ValidationError::EmptyName))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_listing_missing() {
        let svc = make_service();
        let result = svc.get_listing("missing".parse().unwrap()).await;
        assert!(matches!(result, Err(EstateFeedError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_limit_latest_listings_to_five_newest() {
        let svc = make_service();
        for i in 0..7 {
            svc.create_listing(listing(&format!("L{i}"), PropertyType::House, i))
                .await
                .unwrap();
        }

        let latest = svc.latest_listings().await.unwrap();
        let names: Vec<&str> = latest.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["L0", "L1", "L2", "L3", "L4"]);
    }

    #[tokio::test]
    async fn should_pass_filter_and_limit_to_repository() {
        let svc = make_service();
        svc.create_listing(listing("Villa A", PropertyType::Villa, 1))
            .await
            .unwrap();
        svc.create_listing(listing("Condo B", PropertyType::Condo, 2))
            .await
            .unwrap();

        let query = SearchParameters::new(None, Some("Villa".to_string())).to_query(6);
        let found = svc.search_listings(query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Villa A");
    }

    #[tokio::test]
    async fn should_reject_search_with_zero_limit() {
        let svc = make_service();
        let result = svc
            .search_listings(SearchParameters::default().to_query(0))
            .await;
        assert!(matches!(
            result,
            Err(EstateFeedError::Validation(ValidationError::ZeroLimit))
        ));
    }
}
