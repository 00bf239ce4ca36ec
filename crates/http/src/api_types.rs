//! Request and response bodies for the API.

use serde::{Deserialize, Serialize};
use stitchtrack_storage::StorageStats;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub stats: StorageStats,
}

/// Body for advance/back: an optional note to flush against the step being
/// left before the cursor moves.
#[derive(Debug, Default, Deserialize)]
pub struct NavRequest {
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub step: usize,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub favorited: bool,
}
