//! In-process navigation bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use crate::ports::{NavigationRequest, Navigator};

/// [`Navigator`] that broadcasts every request to in-process subscribers.
///
/// Pushing succeeds even when there are no active subscribers
/// (the request is simply dropped).
pub struct InProcessNavigator {
    sender: broadcast::Sender<NavigationRequest>,
}

impl InProcessNavigator {
    /// Create a new navigator with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to navigation requests pushed *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationRequest> {
        self.sender.subscribe()
    }
}

impl Navigator for InProcessNavigator {
    fn push(&self, path: &str) {
        tracing::debug!(path, "navigation requested");
        // send only fails when nobody listens
        let _ = self.sender.send(NavigationRequest {
            path: path.to_string(),
        });
    }
}
