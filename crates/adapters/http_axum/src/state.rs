//! Shared application state for axum handlers.

use std::sync::Arc;
use std::time::Duration;

use estatefeed_app::navigation_bus::InProcessNavigator;
use estatefeed_app::ports::ListingRepository;
use estatefeed_app::services::listing_service::ListingService;

use crate::sessions::{FeedSessions, SessionLimits};

/// Presentation settings for the server-rendered feed.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Name shown next to the greeting.
    pub viewer_name: Option<String>,
    /// Longest a page render waits for the feed requests to settle.
    pub render_timeout: Duration,
    /// Reload interval of pages rendered while a section is still loading.
    pub refresh_seconds: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            viewer_name: None,
            render_timeout: Duration::from_secs(2),
            refresh_seconds: 2,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the listing repository to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need to
/// be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R> {
    /// Listing queries and creation.
    pub listing_service: Arc<ListingService<R>>,
    /// Long-lived feed sessions.
    pub sessions: Arc<FeedSessions<R>>,
    /// Navigator handed to page-scoped feed controllers.
    pub navigator: Arc<InProcessNavigator>,
    pub settings: Arc<FeedSettings>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            listing_service: Arc::clone(&self.listing_service),
            sessions: Arc::clone(&self.sessions),
            navigator: Arc::clone(&self.navigator),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<R> AppState<R>
where
    R: ListingRepository + Send + Sync + 'static,
{
    /// Create a new application state around a listing service.
    pub fn new(listing_service: ListingService<R>, settings: FeedSettings) -> Self {
        Self::from_arc(Arc::new(listing_service), settings, SessionLimits::default())
    }

    /// Create a new application state from a pre-wrapped service.
    ///
    /// Use this when the service is shared with other tasks before the HTTP
    /// state is constructed.
    pub fn from_arc(
        listing_service: Arc<ListingService<R>>,
        settings: FeedSettings,
        limits: SessionLimits,
    ) -> Self {
        Self {
            sessions: Arc::new(FeedSessions::new(Arc::clone(&listing_service), limits)),
            listing_service,
            navigator: Arc::new(InProcessNavigator::new(64)),
            settings: Arc::new(settings),
        }
    }
}
