//! Public catalog routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use stitchtrack_core::{Category, DifficultyLevel, Material, Pattern, Step};

use crate::api_error::ApiError;
use crate::AppState;

const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub async fn list_patterns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Pattern>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(state.patterns.list_patterns(limit).await?))
}

pub async fn get_pattern(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Pattern>, ApiError> {
    Ok(Json(state.patterns.get_pattern(&id).await?))
}

pub async fn list_steps(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Step>>, ApiError> {
    Ok(Json(state.patterns.list_steps(&id).await?))
}

pub async fn list_materials(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Material>>, ApiError> {
    Ok(Json(state.patterns.list_materials(&id).await?))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.patterns.list_categories().await?))
}

pub async fn list_difficulty_levels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DifficultyLevel>>, ApiError> {
    Ok(Json(state.patterns.list_difficulty_levels().await?))
}
