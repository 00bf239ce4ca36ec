//! Favorite routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::api_error::ApiError;
use crate::api_types::FavoriteResponse;
use crate::session::maybe_session;
use crate::AppState;

pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    let favorited = state.favorites.status(session.as_ref(), &id).await?;
    Ok(Json(FavoriteResponse { favorited }))
}

/// Flips membership. The response reflects the state the store confirmed,
/// never an optimistic guess.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<FavoriteResponse>, ApiError> {
    let session = maybe_session(&state, &headers).await?;
    let favorited = state.favorites.toggle(session.as_ref(), &id).await?;
    Ok(Json(FavoriteResponse { favorited }))
}
