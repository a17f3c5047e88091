//! Fetch state machine and request sequencing.
//!
//! Every asynchronous list request owns a [`FetchState`] that moves through
//! `Idle → Loading → {Loaded, Failed}`. Requests are numbered by a
//! [`RequestTracker`]; a completion may only commit while its number is still
//! the latest one issued for that slot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a [`FetchState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Observable state of one list request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchState<T> {
    pub phase: FetchPhase,
    pub data: Option<Vec<T>>,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            phase: FetchPhase::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading`. Previously loaded data stays visible until the new
    /// result lands.
    pub fn begin(&mut self) {
        self.phase = FetchPhase::Loading;
        self.error = None;
    }

    /// Commit a successful result.
    pub fn resolve(&mut self, data: Vec<T>) {
        self.phase = FetchPhase::Loaded;
        self.data = Some(data);
        self.error = None;
    }

    /// Commit a failure. Data from earlier requests is dropped so a failure
    /// is never mistaken for a result.
    pub fn fail(&mut self, error: impl fmt::Display) {
        self.phase = FetchPhase::Failed;
        self.data = None;
        self.error = Some(error.to_string());
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Loaded items, or an empty slice when nothing is present.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|data| !data.is_empty())
    }
}

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestSeq(u64);

impl RequestSeq {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing [`RequestSeq`] values and remembers the
/// latest one.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    next: u64,
    latest: Option<RequestSeq>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self {
            next: 1,
            latest: None,
        }
    }
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request number, superseding every earlier one.
    pub fn issue(&mut self) -> RequestSeq {
        let seq = RequestSeq(self.next);
        self.next += 1;
        self.latest = Some(seq);
        seq
    }

    /// Whether `seq` is the most recently issued request.
    #[must_use]
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        self.latest == Some(seq)
    }

    #[must_use]
    pub fn latest(&self) -> Option<RequestSeq> {
        self.latest
    }

    /// Number of requests issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_idle_without_data() {
        let state: FetchState<u8> = FetchState::new();
        assert_eq!(state.phase, FetchPhase::Idle);
        assert!(state.data.is_none());
        assert!(!state.loading());
        assert!(state.items().is_empty());
    }

    #[test]
    fn should_keep_previous_data_while_reloading() {
        let mut state = FetchState::new();
        state.begin();
        state.resolve(vec![1, 2]);
        state.begin();

        assert!(state.loading());
        assert_eq!(state.items(), &[1, 2]);
    }

    #[test]
    fn should_drop_data_and_record_error_on_failure() {
        let mut state = FetchState::new();
        state.resolve(vec![1]);
        state.begin();
        state.fail("backend unreachable");

        assert_eq!(state.phase, FetchPhase::Failed);
        assert!(state.data.is_none());
        assert_eq!(state.error.as_deref(), Some("backend unreachable"));
    }

    #[test]
    fn should_clear_error_when_next_request_begins() {
        let mut state: FetchState<u8> = FetchState::new();
        state.fail("boom");
        state.begin();
        assert!(state.error.is_none());
    }

    #[test]
    fn should_report_empty_result_as_no_data() {
        let mut state: FetchState<u8> = FetchState::new();
        state.resolve(vec![]);
        assert!(!state.has_data());
        assert_eq!(state.phase, FetchPhase::Loaded);
    }

    #[test]
    fn should_issue_increasing_sequence_numbers() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert_eq!(tracker.issued(), 2);
    }

    #[test]
    fn should_only_consider_latest_request_current() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_current(first));

        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert_eq!(tracker.latest(), Some(second));
    }

    #[test]
    fn should_have_no_current_request_before_first_issue() {
        let tracker = RequestTracker::new();
        assert!(tracker.latest().is_none());
        assert_eq!(tracker.issued(), 0);
    }

    #[test]
    fn should_serialize_phase_in_snake_case() {
        let json = serde_json::to_string(&FetchPhase::Loading).unwrap();
        assert_eq!(json, "\"loading\"");
    }
}
