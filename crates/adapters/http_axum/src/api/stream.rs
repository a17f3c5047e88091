//! Server-Sent Events stream of one feed session.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Serialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_stream::{Stream, StreamExt};

use estatefeed_app::ports::ListingRepository;

use super::sessions::find_session;
use crate::error::ApiError;
use crate::state::AppState;

fn json_event<T: Serialize>(name: &'static str, payload: &T) -> Option<Result<Event, Infallible>> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(Ok(Event::default().event(name).data(json))),
        Err(err) => {
            tracing::warn!(%err, event = name, "failed to serialize SSE payload");
            None
        }
    }
}

/// `GET /api/feed/sessions/{id}/stream`
///
/// Emits a `snapshot` event with the current state on connect and after
/// every committed change, and a `navigate` event for each activation.
/// The stream ends when the session is closed. While it is open the session
/// is never evicted as idle.
pub async fn stream<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (_, session) = find_session(&state, &id)?;

    let attachment = session.activity.attach();
    let snapshots =
        WatchStream::new(session.controller.subscribe()).filter_map(move |snapshot| {
            let _attached = &attachment;
            json_event("snapshot", &snapshot)
        });

    let navigations = BroadcastStream::new(session.navigator.subscribe()).filter_map(
        |result| match result {
            Ok(request) => json_event("navigate", &request),
            Err(BroadcastStreamRecvError::Lagged(n)) => {
                tracing::warn!(
                    skipped = n,
                    "SSE subscriber lagged, some navigation requests were dropped"
                );
                None
            }
        },
    );

    Ok(Sse::new(snapshots.merge(navigations)).keep_alive(KeepAlive::default()))
}
