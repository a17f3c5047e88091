//! `SQLite` implementation of [`ListingRepository`].

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::error::EstateFeedError;
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::{ListingSummary, PropertyType};
use estatefeed_domain::search::ListingQuery;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`ListingSummary`].
struct Wrapper(ListingSummary);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ListingSummary> {
        value.map(|w| w.0)
    }

    fn all(rows: Vec<Self>) -> Vec<ListingSummary> {
        rows.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let property_type: String = row.try_get("property_type")?;
        let price: i64 = row.try_get("price")?;
        let rating: f64 = row.try_get("rating")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        let id = ListingId::try_from(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let property_type = property_type
            .parse::<PropertyType>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let price = u64::try_from(price).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        #[allow(clippy::cast_possible_truncation)]
        let rating = rating as f32;

        Ok(Self(ListingSummary {
            id,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            property_type,
            price,
            rating,
            image_url: row.try_get("image_url")?,
            created_at,
        }))
    }
}

const INSERT: &str = "INSERT INTO listings (id, name, address, property_type, price, rating, image_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM listings WHERE id = ?";
const SELECT_LATEST: &str = "SELECT * FROM listings ORDER BY created_at DESC, id LIMIT ?";
// `LIKE` folds ASCII case only, which is the contract of `search`.
const SELECT_MATCHING: &str = "SELECT * FROM listings \
    WHERE (?1 IS NULL OR property_type = ?1) \
    AND (?2 IS NULL \
        OR name LIKE ?2 ESCAPE '\\' \
        OR address LIKE ?2 ESCAPE '\\' \
        OR property_type LIKE ?2 ESCAPE '\\') \
    ORDER BY created_at DESC, id \
    LIMIT ?3";

/// Turn free text into a `LIKE` pattern matching it anywhere.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// `SQLite`-backed listing repository.
pub struct SqliteListingRepository {
    pool: SqlitePool,
}

impl SqliteListingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ListingRepository for SqliteListingRepository {
    fn create(
        &self,
        listing: ListingSummary,
    ) -> impl Future<Output = Result<ListingSummary, EstateFeedError>> + Send {
        let pool = self.pool.clone();
        async move {
            let price = i64::try_from(listing.price).map_err(|_| StorageError::OutOfRange("price"))?;
            sqlx::query(INSERT)
                .bind(listing.id.as_str())
                .bind(&listing.name)
                .bind(&listing.address)
                .bind(listing.property_type.as_str())
                .bind(price)
                .bind(f64::from(listing.rating))
                .bind(listing.image_url.as_deref())
                .bind(listing.created_at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(listing)
        }
    }

    fn get_by_id(
        &self,
        id: ListingId,
    ) -> impl Future<Output = Result<Option<ListingSummary>, EstateFeedError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_LATEST)
                .bind(sql_limit(limit))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn search(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Vec<ListingSummary>, EstateFeedError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_MATCHING)
                .bind(query.filter.map(PropertyType::as_str))
                .bind(query.query.as_deref().map(contains_pattern))
                .bind(sql_limit(query.limit))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::TimeDelta;

    async fn setup() -> SqliteListingRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteListingRepository::new(db.pool().clone())
    }

    fn listing(name: &str, address: &str, kind: PropertyType, hours_ago: i64) -> ListingSummary {
        ListingSummary::builder()
            .name(name)
            .address(address)
            .property_type(kind)
            .price(420_000)
            .rating(4.5)
            .created_at(Utc::now() - TimeDelta::hours(hours_ago))
            .build()
            .unwrap()
    }

    async fn seed(repo: &SqliteListingRepository) {
        let rows = [
            listing("Seaside Villa", "1 Ocean Rd, Malibu", PropertyType::Villa, 1),
            listing("City Condo", "200 Main St, Denver", PropertyType::Condo, 2),
            listing("Garden Studio", "5 Rose Ln, Portland", PropertyType::Studio, 3),
            listing("Hillside House", "9 Summit Ave, Malibu", PropertyType::House, 4),
            listing("Lake Villa", "3 Shore Dr, Tahoe", PropertyType::Villa, 5),
            listing("Loft 100%", "7 Mill St, Austin", PropertyType::Apartment, 6),
        ];
        for row in rows {
            repo.create(row).await.unwrap();
        }
    }

    fn names(listings: &[ListingSummary]) -> Vec<&str> {
        listings.iter().map(|l| l.name.as_str()).collect()
    }

    fn query(filter: Option<PropertyType>, text: Option<&str>, limit: usize) -> ListingQuery {
        ListingQuery {
            filter,
            query: text.map(str::to_string),
            limit,
        }
    }

    #[tokio::test]
    async fn should_create_and_retrieve_listing_when_valid() {
        let repo = setup().await;
        let created = listing("Seaside Villa", "1 Ocean Rd", PropertyType::Villa, 0);
        let id = created.id.clone();
        repo.create(created.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Seaside Villa");
        assert_eq!(fetched.property_type, PropertyType::Villa);
        assert_eq!(fetched.price, 420_000);
        assert!((fetched.rating - 4.5).abs() < f32::EPSILON);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn should_return_none_when_listing_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id("missing".parse().unwrap()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_return_latest_listings_newest_first() {
        let repo = setup().await;
        seed(&repo).await;

        let latest = repo.latest(3).await.unwrap();
        assert_eq!(names(&latest), ["Seaside Villa", "City Condo", "Garden Studio"]);
    }

    #[tokio::test]
    async fn should_restrict_search_to_filter_type() {
        let repo = setup().await;
        seed(&repo).await;

        let found = repo
            .search(query(Some(PropertyType::Villa), None, 6))
            .await
            .unwrap();
        assert_eq!(names(&found), ["Seaside Villa", "Lake Villa"]);
    }

    #[tokio::test]
    async fn should_match_text_case_insensitively_across_fields() {
        let repo = setup().await;
        seed(&repo).await;

        let by_address = repo.search(query(None, Some("malibu"), 6)).await.unwrap();
        assert_eq!(names(&by_address), ["Seaside Villa", "Hillside House"]);

        let by_type = repo.search(query(None, Some("CONDO"), 6)).await.unwrap();
        assert_eq!(names(&by_type), ["City Condo"]);
    }

    #[tokio::test]
    async fn should_fold_case_of_ascii_letters_only() {
        let repo = setup().await;
        repo.create(listing("Maison Étoile", "2 Rue Haute, Lyon", PropertyType::House, 0))
            .await
            .unwrap();

        let found = repo.search(query(None, Some("ÉTOILE"), 6)).await.unwrap();
        assert_eq!(names(&found), ["Maison Étoile"]);

        let found = repo.search(query(None, Some("étoile"), 6)).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn should_combine_filter_and_text() {
        let repo = setup().await;
        seed(&repo).await;

        let found = repo
            .search(query(Some(PropertyType::House), Some("malibu"), 6))
            .await
            .unwrap();
        assert_eq!(names(&found), ["Hillside House"]);
    }

    #[tokio::test]
    async fn should_treat_wildcards_in_text_literally() {
        let repo = setup().await;
        seed(&repo).await;

        let found = repo.search(query(None, Some("100%"), 6)).await.unwrap();
        assert_eq!(names(&found), ["Loft 100%"]);

        let none = repo.search(query(None, Some("_"), 6)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn should_apply_search_limit() {
        let repo = setup().await;
        seed(&repo).await;

        let found = repo.search(query(None, None, 2)).await.unwrap();
        assert_eq!(names(&found), ["Seaside Villa", "City Condo"]);
    }

    #[tokio::test]
    async fn should_return_empty_when_nothing_matches() {
        let repo = setup().await;
        seed(&repo).await;

        let found = repo
            .search(query(Some(PropertyType::Duplex), None, 6))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn should_reject_duplicate_ids() {
        let repo = setup().await;
        let row = listing("Seaside Villa", "1 Ocean Rd", PropertyType::Villa, 0);
        repo.create(row.clone()).await.unwrap();

        let result = repo.create(row).await;
        assert!(matches!(result, Err(EstateFeedError::Storage(_))));
    }

    #[test]
    fn should_escape_like_wildcards() {
        assert_eq!(contains_pattern("a%b_c\\"), "%a\\%b\\_c\\\\%");
    }
}
