//! Step-by-step progress routes.
//!
//! All of these require a session: progress is per-user state. Boundary
//! navigation (advance at the last step, back at the first) returns the
//! unchanged record with 200 rather than an error — the UI treats it as a
//! disabled button, not a failure.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use stitchtrack_core::UserProject;
use stitchtrack_service::ProjectView;

use crate::api_error::ApiError;
use crate::api_types::{JumpRequest, NavRequest};
use crate::session::maybe_session;
use crate::AppState;

/// Loads the view, creating the progress record on first visit.
pub async fn start(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ProjectView>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    Ok(Json(state.projects.start(session.as_ref(), &id).await?))
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<NavRequest>>,
) -> Result<Json<UserProject>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    let note = body.as_ref().and_then(|b| b.note.as_deref());
    Ok(Json(state.projects.advance(session.as_ref(), &id, note).await?))
}

pub async fn back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<NavRequest>>,
) -> Result<Json<UserProject>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    let note = body.as_ref().and_then(|b| b.note.as_deref());
    Ok(Json(state.projects.back(session.as_ref(), &id, note).await?))
}

pub async fn jump(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<JumpRequest>,
) -> Result<Json<UserProject>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    Ok(Json(
        state.projects.jump_to(session.as_ref(), &id, body.step, body.note.as_deref()).await?,
    ))
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UserProject>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    Ok(Json(state.projects.complete(session.as_ref(), &id).await?))
}
