use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api_error::ApiError;
use crate::api_types::HealthResponse;
use crate::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let stats = state.stats.get_stats().await.map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(HealthResponse { status: "ok", stats }))
}
