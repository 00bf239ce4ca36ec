//! Shared fixtures for service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stitchtrack_core::{ProgressUpdate, UserProject};
use stitchtrack_storage::traits::ProgressStore;
use stitchtrack_storage::{Result as StorageResult, Storage, StorageError};

/// Wraps the real store and injects write failures on demand, for
/// exercising the persist-then-commit rollback path.
pub struct FailingProgressStore {
    inner: Storage,
    fail_updates: AtomicBool,
}

impl FailingProgressStore {
    pub fn new(inner: Storage) -> Self {
        Self { inner, fail_updates: AtomicBool::new(false) }
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressStore for FailingProgressStore {
    async fn get_progress(
        &self,
        user_id: &str,
        pattern_id: &str,
    ) -> StorageResult<Option<UserProject>> {
        self.inner.get_progress(user_id, pattern_id)
    }

    async fn create_progress(&self, project: &UserProject) -> StorageResult<()> {
        self.inner.create_progress(project)
    }

    async fn update_progress(&self, id: &str, update: &ProgressUpdate) -> StorageResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StorageError::Runtime("injected write failure".into()));
        }
        self.inner.update_progress(id, update)
    }
}

pub mod test_storage {
    use super::*;
    use crate::{FavoriteService, NoteService, PatternService, ProjectService};
    use stitchtrack_core::{Pattern, Step};
    use tempfile::TempDir;

    pub fn open() -> (Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(&dir.path().join("test.db")).unwrap();
        (storage, dir)
    }

    /// Saves a pattern with `step_count` sequential steps, returning its id.
    pub fn seed_pattern(storage: &Storage, step_count: u32) -> String {
        let pattern = Pattern::new("Test pattern");
        storage.save_pattern(&pattern).unwrap();
        for order in 1..=step_count {
            let step = Step::new(&pattern.id, order, format!("Round {}", order));
            storage.save_step(&step).unwrap();
        }
        pattern.id
    }

    pub fn project_service() -> (ProjectService, Storage, TempDir) {
        let (storage, dir) = open();
        let service = ProjectService::new(
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
        );
        (service, storage, dir)
    }

    pub fn note_service() -> (NoteService, Storage, TempDir) {
        let (storage, dir) = open();
        let service = NoteService::new(Arc::new(storage.clone()));
        (service, storage, dir)
    }

    pub fn favorite_service() -> (FavoriteService, Storage, TempDir) {
        let (storage, dir) = open();
        let service =
            FavoriteService::new(Arc::new(storage.clone()), Arc::new(storage.clone()));
        (service, storage, dir)
    }

    pub fn pattern_service() -> (PatternService, Storage, TempDir) {
        let (storage, dir) = open();
        let service =
            PatternService::new(Arc::new(storage.clone()), Arc::new(storage.clone()));
        (service, storage, dir)
    }
}
