//! Feed controller — coordinates the home feed's two list requests.
//!
//! The controller owns two independent fetch slots:
//!
//! - **latest**: issued once on [`FeedController::on_mount`], never re-triggered;
//!   feeds the featured carousel.
//! - **filtered**: skipped at mount, issued on every distinct change of the
//!   search parameters; feeds the recommendations grid.
//!
//! Each request runs as its own tokio task and is tagged with a
//! [`RequestSeq`]. A completion commits into its slot only while its number is
//! still the latest issued for that slot, so a slow response for old
//! parameters can never overwrite the result for newer ones.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use estatefeed_domain::error::EstateFeedError;
use estatefeed_domain::feed::FeedSnapshot;
use estatefeed_domain::fetch::{FetchState, RequestSeq, RequestTracker};
use estatefeed_domain::id::ListingId;
use estatefeed_domain::listing::{ListingSummary, detail_path};
use estatefeed_domain::search::{FEED_PAGE_LIMIT, SearchParameters};

use crate::ports::{ListingRepository, Navigator};
use crate::services::listing_service::ListingService;

/// Outcome of one request once its task finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The result was written to the slot.
    Applied,
    /// A newer request superseded this one, or the controller went away.
    Discarded,
}

/// Handle on an issued request.
///
/// Dropping the ticket does not cancel the request.
#[derive(Debug)]
pub struct FetchTicket {
    seq: RequestSeq,
    handle: JoinHandle<Commit>,
}

impl FetchTicket {
    #[must_use]
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }

    /// Wait for the request to finish and report whether it committed.
    pub async fn outcome(self) -> Commit {
        self.handle.await.unwrap_or(Commit::Discarded)
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Latest,
    Filtered,
}

struct ControllerState {
    mounted: bool,
    snapshot: FeedSnapshot,
    latest_requests: RequestTracker,
    filtered_requests: RequestTracker,
    tasks: Vec<AbortHandle>,
}

impl ControllerState {
    fn tracker(&mut self, slot: Slot) -> &mut RequestTracker {
        match slot {
            Slot::Latest => &mut self.latest_requests,
            Slot::Filtered => &mut self.filtered_requests,
        }
    }

    fn fetch_state(&mut self, slot: Slot) -> &mut FetchState<ListingSummary> {
        match slot {
            Slot::Latest => &mut self.snapshot.latest,
            Slot::Filtered => &mut self.snapshot.filtered,
        }
    }
}

struct Shared<R, N> {
    service: Arc<ListingService<R>>,
    navigator: N,
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<FeedSnapshot>,
}

impl<R, N> Shared<R, N> {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(
        &self,
        slot: Slot,
        seq: RequestSeq,
        result: Result<Vec<ListingSummary>, EstateFeedError>,
    ) -> Commit {
        let mut state = self.lock();
        if !state.tracker(slot).is_current(seq) {
            tracing::debug!(?slot, %seq, "discarding stale result");
            return Commit::Discarded;
        }

        let fetch = state.fetch_state(slot);
        match result {
            Ok(items) => {
                tracing::debug!(?slot, %seq, count = items.len(), "committing result");
                fetch.resolve(items);
            }
            Err(err) => {
                tracing::warn!(?slot, %seq, error = %err, "listing request failed");
                fetch.fail(&err);
            }
        }
        self.snapshots.send_replace(state.snapshot.clone());
        Commit::Applied
    }
}

/// Controller behind one mounted home feed.
///
/// Dropping the controller unmounts it: in-flight requests are aborted and
/// their results never land.
pub struct FeedController<R, N> {
    shared: Arc<Shared<R, N>>,
}

impl<R, N> FeedController<R, N>
where
    R: ListingRepository + Send + Sync + 'static,
    N: Navigator + 'static,
{
    /// Create an unmounted controller. Nothing is fetched until
    /// [`on_mount`](Self::on_mount).
    pub fn new(service: Arc<ListingService<R>>, navigator: N) -> Self {
        let snapshot = FeedSnapshot::default();
        let (snapshots, _) = watch::channel(snapshot.clone());
        Self {
            shared: Arc::new(Shared {
                service,
                navigator,
                state: Mutex::new(ControllerState {
                    mounted: false,
                    snapshot,
                    latest_requests: RequestTracker::new(),
                    filtered_requests: RequestTracker::new(),
                    tasks: Vec::new(),
                }),
                snapshots,
            }),
        }
    }

    /// Issue the latest-listings request. Only the first call does anything.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_mount(&self) -> Option<FetchTicket> {
        let mut state = self.shared.lock();
        if state.mounted {
            tracing::debug!("feed already mounted");
            return None;
        }
        state.mounted = true;

        let seq = self.begin(&mut state, Slot::Latest);
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let result = shared.service.latest_listings().await;
            shared.commit(Slot::Latest, seq, result)
        });
        Some(Self::track(&mut state, seq, handle))
    }

    /// Observe the current search parameters.
    ///
    /// Issues a filtered request when the pair differs from the last one
    /// observed (the first observation always differs). Repeating the same
    /// pair returns `None` without touching the backend.
    pub fn on_parameters_changed(&self, params: SearchParameters) -> Option<FetchTicket> {
        let mut state = self.shared.lock();
        if state.snapshot.params.as_ref() == Some(&params) {
            return None;
        }
        state.snapshot.params = Some(params.clone());
        Some(self.issue_filtered(&mut state, &params))
    }

    /// Re-issue the filtered request for the current parameters.
    ///
    /// Returns `None` while no parameters have been observed yet.
    pub fn refresh(&self) -> Option<FetchTicket> {
        let mut state = self.shared.lock();
        let params = state.snapshot.params.clone()?;
        Some(self.issue_filtered(&mut state, &params))
    }

    /// Ask the navigator to open the detail view for `id`.
    ///
    /// Returns the requested path. Controller state is left untouched.
    pub fn on_item_activated(&self, id: &ListingId) -> String {
        let path = detail_path(id);
        self.shared.navigator.push(&path);
        path
    }

    /// Current committed state.
    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Receive every committed state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Wait until neither request is loading and return that snapshot.
    pub async fn settled(&self) -> FeedSnapshot {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(FeedSnapshot::is_settled)
            .await
            .map(|snapshot| snapshot.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    fn issue_filtered(
        &self,
        state: &mut ControllerState,
        params: &SearchParameters,
    ) -> FetchTicket {
        let seq = self.begin(state, Slot::Filtered);
        let query = params.to_query(FEED_PAGE_LIMIT);
        tracing::debug!(%seq, ?query, "issuing filtered request");

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let result = shared.service.search_listings(query).await;
            shared.commit(Slot::Filtered, seq, result)
        });
        Self::track(state, seq, handle)
    }

    fn begin(&self, state: &mut ControllerState, slot: Slot) -> RequestSeq {
        let seq = state.tracker(slot).issue();
        state.fetch_state(slot).begin();
        self.shared.snapshots.send_replace(state.snapshot.clone());
        seq
    }

    fn track(
        state: &mut ControllerState,
        seq: RequestSeq,
        handle: JoinHandle<Commit>,
    ) -> FetchTicket {
        state.tasks.retain(|task| !task.is_finished());
        state.tasks.push(handle.abort_handle());
        FetchTicket { seq, handle }
    }
}

impl<R, N> Drop for FeedController<R, N> {
    fn drop(&mut self) {
        let state = self.shared.lock();
        for task in &state.tasks {
            task.abort();
        }
    }
}
