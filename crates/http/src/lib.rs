//! HTTP API server for stitchtrack.
//!
//! Routes are thin: they extract the caller's session from the `X-User-Id`
//! header, delegate to the service layer, and map `ServiceError` variants
//! onto status codes via `ApiError`. Read-only catalog routes are public;
//! everything touching per-user state requires a session.

pub mod api_error;
mod api_types;
mod handlers;
mod session;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use stitchtrack_service::{FavoriteService, NoteService, PatternService, ProjectService};
use stitchtrack_storage::traits::{CatalogStore, StatsStore};
use stitchtrack_storage::Storage;

pub use api_types::HealthResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub patterns: PatternService,
    pub projects: ProjectService,
    pub notes: NoteService,
    pub favorites: FavoriteService,
    pub catalog: Arc<dyn CatalogStore>,
    pub stats: Arc<dyn StatsStore>,
}

impl AppState {
    /// Wires every service against one storage backend.
    pub fn new(storage: Storage) -> Self {
        let store = Arc::new(storage);
        Self {
            patterns: PatternService::new(store.clone(), store.clone()),
            projects: ProjectService::new(store.clone(), store.clone(), store.clone()),
            notes: NoteService::new(store.clone()),
            favorites: FavoriteService::new(store.clone(), store.clone()),
            catalog: store.clone(),
            stats: store,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/patterns", get(handlers::patterns::list_patterns))
        .route("/api/patterns/{id}", get(handlers::patterns::get_pattern))
        .route("/api/patterns/{id}/steps", get(handlers::patterns::list_steps))
        .route("/api/patterns/{id}/materials", get(handlers::patterns::list_materials))
        .route("/api/categories", get(handlers::patterns::list_categories))
        .route("/api/difficulty-levels", get(handlers::patterns::list_difficulty_levels))
        .route("/api/patterns/{id}/progress", get(handlers::progress::start))
        .route("/api/patterns/{id}/progress/advance", post(handlers::progress::advance))
        .route("/api/patterns/{id}/progress/back", post(handlers::progress::back))
        .route("/api/patterns/{id}/progress/jump", post(handlers::progress::jump))
        .route("/api/patterns/{id}/progress/complete", post(handlers::progress::complete))
        .route(
            "/api/patterns/{id}/steps/{step_id}/note",
            get(handlers::notes::get_note).put(handlers::notes::put_note),
        )
        .route("/api/patterns/{id}/favorite", get(handlers::favorites::status))
        .route("/api/patterns/{id}/favorite/toggle", post(handlers::favorites::toggle))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
