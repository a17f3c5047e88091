//! Demo catalog inserted into an empty database so the feed has something
//! to show on first start.

use chrono::TimeDelta;

use estatefeed_app::ports::ListingRepository;
use estatefeed_app::services::listing_service::ListingService;
use estatefeed_domain::error::EstateFeedError;
use estatefeed_domain::listing::{ListingSummary, PropertyType};
use estatefeed_domain::time::now;

const CATALOG: &[(&str, &str, &str, PropertyType, u64, f32)] = &[
    ("harbor-view-villa", "Harbor View Villa", "12 Seawall Road, Port Elms", PropertyType::Villa, 2_450_000, 4.9),
    ("maple-street-house", "Maple Street House", "48 Maple Street, Brookfield", PropertyType::House, 685_000, 4.6),
    ("riverside-condo", "Riverside Condo", "300 River Walk, Unit 14B, Lowtown", PropertyType::Condo, 412_000, 4.4),
    ("twin-oaks-duplex", "Twin Oaks Duplex", "7 Oak Lane, Millbrook", PropertyType::Duplex, 530_000, 4.2),
    ("artist-loft-studio", "Artist Loft Studio", "91 Foundry Street, Arts District", PropertyType::Studio, 198_000, 4.7),
    ("parkside-apartment", "Parkside Apartment", "15 Green Park Avenue, Apt 6", PropertyType::Apartment, 325_000, 4.3),
    ("cedar-row-townhouse", "Cedar Row Townhouse", "22 Cedar Row, Hillcrest", PropertyType::Townhouse, 575_000, 4.5),
    ("lakeside-cabin", "Lakeside Cabin", "3 Shoreline Trail, Pine Lake", PropertyType::Other, 260_000, 4.8),
    ("sunset-hills-house", "Sunset Hills House", "110 Sunset Boulevard, Westview", PropertyType::House, 890_000, 4.1),
    ("old-town-apartment", "Old Town Apartment", "5 Market Square, Old Town", PropertyType::Apartment, 289_000, 3.9),
];

/// Insert the demo catalog unless listings already exist.
///
/// Returns the number of listings inserted.
///
/// # Errors
///
/// Returns the first error reported by the listing service.
pub async fn seed<R>(service: &ListingService<R>) -> Result<usize, EstateFeedError>
where
    R: ListingRepository + Send + Sync,
{
    if !service.latest_listings().await?.is_empty() {
        tracing::debug!("catalog not empty, skipping demo seed");
        return Ok(0);
    }

    let newest = now();
    for (age, &(id, name, address, property_type, price, rating)) in (0u16..).zip(CATALOG) {
        let listing = ListingSummary::builder()
            .id(id.parse()?)
            .name(name)
            .address(address)
            .property_type(property_type)
            .price(price)
            .rating(rating)
            .created_at(newest - TimeDelta::minutes(i64::from(age)))
            .build()?;
        service.create_listing(listing).await?;
    }

    tracing::info!(count = CATALOG.len(), "seeded demo catalog");
    Ok(CATALOG.len())
}
