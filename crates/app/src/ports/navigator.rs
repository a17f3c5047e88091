//! Navigator port — fire-and-forget requests to open another screen.

use serde::Serialize;

/// A request to navigate to `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub path: String,
}

/// Receives navigation requests. Implementations must not block.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

impl<T: Navigator> Navigator for std::sync::Arc<T> {
    fn push(&self, path: &str) {
        (**self).push(path);
    }
}
