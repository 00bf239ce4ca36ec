//! Per-step note routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use stitchtrack_core::UserNote;

use crate::api_error::ApiError;
use crate::api_types::{NoteRequest, NoteResponse};
use crate::session::maybe_session;
use crate::AppState;

/// Content for the caller's note on a step; empty string when none exists.
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path((id, step_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<NoteResponse>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    let content = state.notes.load(session.as_ref(), &id, &step_id).await?;
    Ok(Json(NoteResponse { content }))
}

pub async fn put_note(
    State(state): State<Arc<AppState>>,
    Path((id, step_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<NoteRequest>,
) -> Result<Json<UserNote>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    Ok(Json(state.notes.save(session.as_ref(), &id, &step_id, &body.content).await?))
}
