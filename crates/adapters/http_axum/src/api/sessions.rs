//! JSON REST handlers for long-lived feed sessions.
//!
//! A session wraps one mounted feed controller. Clients push parameter
//! changes and activations here and read the committed state back either by
//! polling `GET` or through the SSE stream.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use estatefeed_app::feed_controller::FetchTicket;
use estatefeed_app::ports::ListingRepository;
use estatefeed_domain::error::NotFoundError;
use estatefeed_domain::feed::{FeedSnapshot, FeedView};
use estatefeed_domain::id::{ListingId, SessionId};
use estatefeed_domain::search::SearchParameters;
use estatefeed_domain::time::local_hour;

use crate::error::ApiError;
use crate::sessions::FeedSession;
use crate::state::AppState;

/// Committed state of a session together with its display projection.
#[derive(Serialize)]
pub struct SessionBody {
    pub id: String,
    pub snapshot: FeedSnapshot,
    pub view: FeedView,
}

/// Whether a command issued a backend request.
#[derive(Serialize)]
pub struct IssueBody {
    pub issued: bool,
    pub seq: Option<u64>,
}

impl From<Option<FetchTicket>> for IssueBody {
    fn from(ticket: Option<FetchTicket>) -> Self {
        Self {
            issued: ticket.is_some(),
            seq: ticket.map(|ticket| ticket.seq().value()),
        }
    }
}

/// Navigation requested by an activation.
#[derive(Serialize)]
pub struct NavigateBody {
    pub path: String,
}

/// Possible responses from the open endpoint.
pub enum OpenResponse {
    Created(Json<SessionBody>),
}

impl IntoResponse for OpenResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<SessionBody>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the parameter and refresh endpoints.
pub enum IssueResponse {
    Accepted(Json<IssueBody>),
}

impl IntoResponse for IssueResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// Possible responses from the activate endpoint.
pub enum ActivateResponse {
    Ok(Json<NavigateBody>),
}

impl IntoResponse for ActivateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the close endpoint.
pub enum CloseResponse {
    NoContent,
}

impl IntoResponse for CloseResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn session_not_found(id: &str) -> ApiError {
    ApiError::from(NotFoundError {
        entity: "Feed session",
        id: id.to_string(),
    })
}

pub(crate) fn parse_session_id(id: &str) -> Result<SessionId, ApiError> {
    SessionId::from_str(id).map_err(|_| session_not_found(id))
}

pub(crate) fn find_session<R>(
    state: &AppState<R>,
    id: &str,
) -> Result<(SessionId, Arc<FeedSession<R>>), ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let session_id = parse_session_id(id)?;
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| session_not_found(id))?;
    Ok((session_id, session))
}

fn session_body<R>(state: &AppState<R>, id: SessionId, session: &FeedSession<R>) -> SessionBody
where
    R: ListingRepository + Send + Sync + 'static,
{
    let snapshot = session.controller.snapshot();
    let view = FeedView::project(&snapshot, local_hour(), state.settings.viewer_name.clone());
    SessionBody {
        id: id.to_string(),
        snapshot,
        view,
    }
}

/// `POST /api/feed/sessions` — mount a new feed.
pub async fn open<R>(State(state): State<AppState<R>>) -> Result<OpenResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (id, session) = state
        .sessions
        .open()
        .ok_or(ApiError::Unavailable("too many feed sessions"))?;
    Ok(OpenResponse::Created(Json(session_body(
        &state, id, &session,
    ))))
}

/// `GET /api/feed/sessions/{id}`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (id, session) = find_session(&state, &id)?;
    Ok(GetResponse::Ok(Json(session_body(&state, id, &session))))
}

/// `PUT /api/feed/sessions/{id}/params` — observe new search parameters.
pub async fn change_parameters<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(params): Json<SearchParameters>,
) -> Result<IssueResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (_, session) = find_session(&state, &id)?;
    let ticket = session.controller.on_parameters_changed(params);
    Ok(IssueResponse::Accepted(Json(ticket.into())))
}

/// `POST /api/feed/sessions/{id}/refresh` — re-run the filtered request.
pub async fn refresh<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<IssueResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (_, session) = find_session(&state, &id)?;
    let ticket = session.controller.refresh();
    Ok(IssueResponse::Accepted(Json(ticket.into())))
}

/// `POST /api/feed/sessions/{id}/activate/{listing_id}` — open a listing.
pub async fn activate<R>(
    State(state): State<AppState<R>>,
    Path((id, listing_id)): Path<(String, String)>,
) -> Result<ActivateResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let (_, session) = find_session(&state, &id)?;
    let listing_id = ListingId::from_str(&listing_id)?;
    let path = session.controller.on_item_activated(&listing_id);
    Ok(ActivateResponse::Ok(Json(NavigateBody { path })))
}

/// `DELETE /api/feed/sessions/{id}` — unmount the feed.
pub async fn close<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<CloseResponse, ApiError>
where
    R: ListingRepository + Send + Sync + 'static,
{
    let session_id = parse_session_id(&id)?;
    if !state.sessions.close(session_id) {
        return Err(session_not_found(&id));
    }
    Ok(CloseResponse::NoContent)
}
