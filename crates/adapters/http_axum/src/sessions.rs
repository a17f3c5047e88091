//! Registry of long-lived feed sessions.
//!
//! A session is one mounted [`FeedController`] that clients drive over HTTP
//! (parameter changes, refresh, item activation) and observe through the
//! SSE stream. Closing a session drops its controller, which unmounts it.
//!
//! Clients may vanish without closing their session. Every lookup marks the
//! session as seen, an attached SSE stream keeps it alive, and sessions left
//! idle longer than [`SessionLimits::idle_timeout`] are evicted before a new
//! one is opened.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use estatefeed_app::feed_controller::FeedController;
use estatefeed_app::navigation_bus::InProcessNavigator;
use estatefeed_app::ports::ListingRepository;
use estatefeed_app::services::listing_service::ListingService;
use estatefeed_domain::id::SessionId;

/// Capacity and expiry of the session registry.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// Upper bound on concurrently open sessions.
    pub max_sessions: usize,
    /// Sessions without a request or an attached stream for this long are
    /// evicted.
    pub idle_timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_timeout: Duration::from_secs(300),
        }
    }
}

/// Liveness bookkeeping of one session.
#[derive(Debug)]
pub struct SessionActivity {
    last_seen: Mutex<Instant>,
    streams: AtomicUsize,
}

impl SessionActivity {
    fn new(now: Instant) -> Self {
        Self {
            last_seen: Mutex::new(now),
            streams: AtomicUsize::new(0),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&self) {
        self.touch_at(Instant::now());
    }

    fn touch_at(&self, now: Instant) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Keep the session alive until the returned guard is dropped.
    #[must_use]
    pub fn attach(self: &Arc<Self>) -> StreamAttachment {
        self.streams.fetch_add(1, Ordering::AcqRel);
        StreamAttachment(Arc::clone(self))
    }

    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        if self.streams.load(Ordering::Acquire) > 0 {
            return false;
        }
        let last_seen = *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_seen) >= timeout
    }
}

/// Held by an open SSE stream; the idle clock restarts when it is dropped.
#[derive(Debug)]
pub struct StreamAttachment(Arc<SessionActivity>);

impl Drop for StreamAttachment {
    fn drop(&mut self) {
        self.0.streams.fetch_sub(1, Ordering::AcqRel);
        self.0.touch();
    }
}

/// One mounted feed and the navigator its activations go to.
pub struct FeedSession<R> {
    pub controller: FeedController<R, Arc<InProcessNavigator>>,
    pub navigator: Arc<InProcessNavigator>,
    pub activity: Arc<SessionActivity>,
}

type SessionMap<R> = HashMap<SessionId, Arc<FeedSession<R>>>;

/// All open sessions, keyed by [`SessionId`].
pub struct FeedSessions<R> {
    service: Arc<ListingService<R>>,
    sessions: RwLock<SessionMap<R>>,
    limits: SessionLimits,
}

impl<R> FeedSessions<R>
where
    R: ListingRepository + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(service: Arc<ListingService<R>>, limits: SessionLimits) -> Self {
        Self {
            service,
            sessions: RwLock::new(HashMap::new()),
            limits,
        }
    }

    /// Mount a new feed and register it.
    ///
    /// Idle sessions are evicted first. Returns `None` when the session cap
    /// is still reached afterwards.
    pub fn open(&self) -> Option<(SessionId, Arc<FeedSession<R>>)> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Self::evict(&mut sessions, now, self.limits.idle_timeout);
        if sessions.len() >= self.limits.max_sessions {
            tracing::warn!(max = self.limits.max_sessions, "feed session cap reached");
            return None;
        }

        let navigator = Arc::new(InProcessNavigator::new(16));
        let controller = FeedController::new(Arc::clone(&self.service), Arc::clone(&navigator));
        controller.on_mount();

        let id = SessionId::new();
        let session = Arc::new(FeedSession {
            controller,
            navigator,
            activity: Arc::new(SessionActivity::new(now)),
        });
        sessions.insert(id, Arc::clone(&session));
        tracing::debug!(session = %id, open = sessions.len(), "feed session opened");
        Some((id, session))
    }

    /// Look up a session and mark it as seen.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Arc<FeedSession<R>>> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()?;
        session.activity.touch();
        Some(session)
    }

    /// Unregister a session. Returns `false` if it did not exist.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            tracing::debug!(session = %id, "feed session closed");
        }
        removed.is_some()
    }

    /// Drop every session idle at `now`. Returns how many were evicted.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Self::evict(&mut sessions, now, self.limits.idle_timeout)
    }

    fn evict(sessions: &mut SessionMap<R>, now: Instant, timeout: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|id, session| {
            let idle = session.activity.is_idle(now, timeout);
            if idle {
                tracing::debug!(session = %id, "evicting idle feed session");
            }
            !idle
        });
        before - sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
