//! Storage trait abstraction
//!
//! Defines async domain traits for storage operations, enabling mocking in
//! service tests and keeping handlers backend-agnostic.

use async_trait::async_trait;
use stitchtrack_core::{
    Category, DifficultyLevel, Favorite, Material, Pattern, Profile, ProgressUpdate, Step,
    UserNote, UserProject,
};

use crate::error::Result;
use crate::types::StorageStats;

/// Read and authoring operations on the pattern catalog.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Get pattern by ID.
    async fn get_pattern(&self, id: &str) -> Result<Option<Pattern>>;

    /// List patterns, newest first. `public_only` hides drafts.
    async fn list_patterns(&self, public_only: bool, limit: usize) -> Result<Vec<Pattern>>;

    /// Steps for a pattern, ordered by `step_order` ascending.
    async fn list_steps(&self, pattern_id: &str) -> Result<Vec<Step>>;

    /// Materials for a pattern.
    async fn list_materials(&self, pattern_id: &str) -> Result<Vec<Material>>;

    /// Save or replace a pattern.
    async fn save_pattern(&self, pattern: &Pattern) -> Result<()>;

    /// Save or replace a step.
    async fn save_step(&self, step: &Step) -> Result<()>;

    /// Save or replace a material.
    async fn save_material(&self, material: &Material) -> Result<()>;
}

/// Per-user progress record operations.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Get the progress record for a (user, pattern) pair.
    async fn get_progress(&self, user_id: &str, pattern_id: &str)
        -> Result<Option<UserProject>>;

    /// Insert a fresh progress record. Fails `Duplicate` if one already
    /// exists for the pair.
    async fn create_progress(&self, project: &UserProject) -> Result<()>;

    /// Apply a partial update to a progress record.
    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> Result<()>;
}

/// Per-step note operations.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Get the note for a (user, pattern, step) triple.
    async fn get_note(
        &self,
        user_id: &str,
        pattern_id: &str,
        step_id: &str,
    ) -> Result<Option<UserNote>>;

    /// Insert or update the note for its key triple. Never duplicates.
    async fn upsert_note(&self, note: &UserNote) -> Result<()>;
}

/// Favorite membership operations.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Whether the user has favorited the pattern.
    async fn is_favorited(&self, user_id: &str, pattern_id: &str) -> Result<bool>;

    /// Add a favorite. Idempotent.
    async fn add_favorite(&self, favorite: &Favorite) -> Result<()>;

    /// Remove a favorite. Returns `true` if a row was deleted.
    async fn remove_favorite(&self, user_id: &str, pattern_id: &str) -> Result<bool>;
}

/// Catalog reference data and user profiles.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn save_category(&self, category: &Category) -> Result<()>;
    async fn list_difficulty_levels(&self) -> Result<Vec<DifficultyLevel>>;
    async fn save_difficulty_level(&self, level: &DifficultyLevel) -> Result<()>;
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>>;
    async fn save_profile(&self, profile: &Profile) -> Result<()>;
}

/// Aggregate row counts.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn get_stats(&self) -> Result<StorageStats>;
}
