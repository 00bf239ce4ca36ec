//! Async trait implementations for SQLite `Storage` via `spawn_blocking`.

use async_trait::async_trait;
use stitchtrack_core::{
    Category, DifficultyLevel, Favorite, Material, Pattern, Profile, ProgressUpdate, Step,
    UserNote, UserProject,
};

use crate::error::{Result, StorageError};
use crate::traits::{
    CatalogStore, FavoriteStore, NoteStore, PatternStore, ProgressStore, StatsStore,
};
use crate::types::StorageStats;
use crate::Storage;

/// Helper: run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Runtime(format!("spawn_blocking join error: {e}")))?
}

/// Body-generating macro for async-to-blocking delegation.
///
/// Each argument is annotated with a capture kind:
/// - `@ref arg` — `.clone()` a `&T`, pass as `&arg`
/// - `@str arg` — `.to_owned()` a `&str`, pass as `&arg`
/// - `@val arg` — move directly (Copy/owned types)
macro_rules! delegate {
    ($self:ident, $method:ident $(, @$kind:ident $arg:ident)*) => {{
        let s = $self.clone();
        $(delegate!(@capture $kind $arg);)*
        blocking(move || s.$method($(delegate!(@pass $kind $arg)),*)).await
    }};
    (@capture ref $arg:ident) => { let $arg = $arg.clone(); };
    (@capture str $arg:ident) => { let $arg = $arg.to_owned(); };
    (@capture val $arg:ident) => { };
    (@pass ref $arg:ident) => { &$arg };
    (@pass str $arg:ident) => { &$arg };
    (@pass val $arg:ident) => { $arg };
}

// ── PatternStore ─────────────────────────────────────────────────

#[async_trait]
impl PatternStore for Storage {
    async fn get_pattern(&self, id: &str) -> Result<Option<Pattern>> {
        delegate!(self, get_pattern, @str id)
    }
    async fn list_patterns(&self, public_only: bool, limit: usize) -> Result<Vec<Pattern>> {
        delegate!(self, list_patterns, @val public_only, @val limit)
    }
    async fn list_steps(&self, pattern_id: &str) -> Result<Vec<Step>> {
        delegate!(self, list_steps, @str pattern_id)
    }
    async fn list_materials(&self, pattern_id: &str) -> Result<Vec<Material>> {
        delegate!(self, list_materials, @str pattern_id)
    }
    async fn save_pattern(&self, pattern: &Pattern) -> Result<()> {
        delegate!(self, save_pattern, @ref pattern)
    }
    async fn save_step(&self, step: &Step) -> Result<()> {
        delegate!(self, save_step, @ref step)
    }
    async fn save_material(&self, material: &Material) -> Result<()> {
        delegate!(self, save_material, @ref material)
    }
}

// ── ProgressStore ────────────────────────────────────────────────

#[async_trait]
impl ProgressStore for Storage {
    async fn get_progress(
        &self,
        user_id: &str,
        pattern_id: &str,
    ) -> Result<Option<UserProject>> {
        delegate!(self, get_progress, @str user_id, @str pattern_id)
    }
    async fn create_progress(&self, project: &UserProject) -> Result<()> {
        delegate!(self, create_progress, @ref project)
    }
    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> Result<()> {
        delegate!(self, update_progress, @str id, @ref update)
    }
}

// ── NoteStore ────────────────────────────────────────────────────

#[async_trait]
impl NoteStore for Storage {
    async fn get_note(
        &self,
        user_id: &str,
        pattern_id: &str,
        step_id: &str,
    ) -> Result<Option<UserNote>> {
        delegate!(self, get_note, @str user_id, @str pattern_id, @str step_id)
    }
    async fn upsert_note(&self, note: &UserNote) -> Result<()> {
        delegate!(self, upsert_note, @ref note)
    }
}

// ── FavoriteStore ────────────────────────────────────────────────

#[async_trait]
impl FavoriteStore for Storage {
    async fn is_favorited(&self, user_id: &str, pattern_id: &str) -> Result<bool> {
        delegate!(self, is_favorited, @str user_id, @str pattern_id)
    }
    async fn add_favorite(&self, favorite: &Favorite) -> Result<()> {
        delegate!(self, add_favorite, @ref favorite)
    }
    async fn remove_favorite(&self, user_id: &str, pattern_id: &str) -> Result<bool> {
        delegate!(self, remove_favorite, @str user_id, @str pattern_id)
    }
}

// ── CatalogStore ─────────────────────────────────────────────────

#[async_trait]
impl CatalogStore for Storage {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        delegate!(self, list_categories)
    }
    async fn save_category(&self, category: &Category) -> Result<()> {
        delegate!(self, save_category, @ref category)
    }
    async fn list_difficulty_levels(&self) -> Result<Vec<DifficultyLevel>> {
        delegate!(self, list_difficulty_levels)
    }
    async fn save_difficulty_level(&self, level: &DifficultyLevel) -> Result<()> {
        delegate!(self, save_difficulty_level, @ref level)
    }
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        delegate!(self, get_profile, @str id)
    }
    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        delegate!(self, save_profile, @ref profile)
    }
}

// ── StatsStore ───────────────────────────────────────────────────

#[async_trait]
impl StatsStore for Storage {
    async fn get_stats(&self) -> Result<StorageStats> {
        delegate!(self, get_stats)
    }
}
