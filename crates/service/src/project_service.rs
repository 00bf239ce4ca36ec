//! Navigator orchestration: keeps the persisted progress record in sync
//! with cursor moves.
//!
//! Each operation rebuilds the pure [`StepNavigator`] from the persisted
//! record, computes the transition, persists it, and only then reports the
//! new state. A failed write therefore never leaks an optimistic cursor to
//! the caller. Boundary no-ops (advance at the last step, back at the
//! first) issue no write at all.

use std::sync::Arc;

use stitchtrack_core::{
    CursorMove, ProgressUpdate, Step, StepNavigator, UserNote, UserProject, UserSession,
};
use stitchtrack_storage::traits::{NoteStore, PatternStore, ProgressStore};

use crate::error::{require_session, Result, ServiceError};

/// What the step-by-step view needs to render: the steps and, when the
/// pattern has any, the user's progress record.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProjectView {
    /// `None` only for zero-step patterns (guarded empty state).
    pub project: Option<UserProject>,
    pub steps: Vec<Step>,
}

enum Nav {
    Advance,
    Back,
    Jump(usize),
}

pub struct ProjectService {
    patterns: Arc<dyn PatternStore>,
    progress: Arc<dyn ProgressStore>,
    notes: Arc<dyn NoteStore>,
}

impl ProjectService {
    pub fn new(
        patterns: Arc<dyn PatternStore>,
        progress: Arc<dyn ProgressStore>,
        notes: Arc<dyn NoteStore>,
    ) -> Self {
        Self { patterns, progress, notes }
    }

    /// Loads the step-by-step view, lazily creating the progress record on
    /// first visit. A persisted cursor past the end of a shrunken step list
    /// is clamped. Zero-step patterns get no record: there is no position
    /// to track and the caller renders an empty state.
    pub async fn start(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
    ) -> Result<ProjectView> {
        let session = require_session(session)?;
        let steps = self.load_steps(pattern_id).await?;
        if steps.is_empty() {
            return Ok(ProjectView { project: None, steps });
        }

        let project = match self.progress.get_progress(&session.user_id, pattern_id).await? {
            Some(mut existing) => {
                let last = steps.len() - 1;
                if existing.current_step > last {
                    existing.current_step = last;
                }
                existing
            },
            None => {
                let fresh = UserProject::new(&session.user_id, pattern_id);
                match self.progress.create_progress(&fresh).await {
                    Ok(()) => fresh,
                    // another tab won the race; use its record
                    Err(e) if e.is_duplicate() => self
                        .progress
                        .get_progress(&session.user_id, pattern_id)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("user_project", pattern_id))?,
                    Err(e) => return Err(e.into()),
                }
            },
        };
        Ok(ProjectView { project: Some(project), steps })
    }

    /// Moves to the next step. `note`, when present and non-blank, is
    /// flushed to the step being left before the cursor moves, so switching
    /// steps never silently drops an edit.
    pub async fn advance(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        note: Option<&str>,
    ) -> Result<UserProject> {
        self.navigate(session, pattern_id, Nav::Advance, note).await
    }

    /// Moves to the previous step. Same note-flush contract as [`advance`].
    ///
    /// [`advance`]: Self::advance
    pub async fn back(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        note: Option<&str>,
    ) -> Result<UserProject> {
        self.navigate(session, pattern_id, Nav::Back, note).await
    }

    /// Direct jump from the step list side panel; out-of-range targets are
    /// clamped.
    pub async fn jump_to(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        index: usize,
        note: Option<&str>,
    ) -> Result<UserProject> {
        self.navigate(session, pattern_id, Nav::Jump(index), note).await
    }

    /// Marks the project complete: progress 100, `is_completed` latched.
    /// Terminal — nothing unsets it, and navigating afterwards keeps it.
    pub async fn complete(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
    ) -> Result<UserProject> {
        let session = require_session(session)?;
        let mut project = self.require_progress(&session.user_id, pattern_id).await?;
        let update = ProgressUpdate::completion();
        self.progress.update_progress(&project.id, &update).await?;
        project.is_completed = true;
        project.progress = 100;
        project.last_updated_at = update.last_updated_at;
        tracing::info!(pattern_id, user_id = %session.user_id, "project completed");
        Ok(project)
    }

    async fn navigate(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        nav: Nav,
        note: Option<&str>,
    ) -> Result<UserProject> {
        let session = require_session(session)?;
        let steps = self.load_steps(pattern_id).await?;
        let mut project = self.require_progress(&session.user_id, pattern_id).await?;

        let navigator = StepNavigator::new(steps.len(), Some(&project))
            .ok_or_else(|| ServiceError::not_found("step", pattern_id))?;
        let mv = match nav {
            Nav::Advance => navigator.advance(),
            Nav::Back => navigator.back(),
            Nav::Jump(index) => navigator.jump_to(index),
        };
        let Some(mv) = mv else {
            // boundary: cursor unchanged, no write
            return Ok(project);
        };

        self.flush_note(session, &project, &steps, note).await?;
        self.persist_move(&mut project, mv).await?;
        Ok(project)
    }

    /// Persist first, then commit to the returned record. On failure the
    /// record keeps its pre-move cursor.
    async fn persist_move(&self, project: &mut UserProject, mv: CursorMove) -> Result<()> {
        let update = ProgressUpdate::cursor(mv.index, mv.progress);
        self.progress.update_progress(&project.id, &update).await?;
        project.current_step = mv.index;
        project.progress = mv.progress;
        project.last_updated_at = update.last_updated_at;
        Ok(())
    }

    /// Upserts a non-blank note against the step being left.
    async fn flush_note(
        &self,
        session: &UserSession,
        project: &UserProject,
        steps: &[Step],
        note: Option<&str>,
    ) -> Result<()> {
        let Some(content) = note else { return Ok(()) };
        if content.trim().is_empty() {
            return Ok(());
        }
        let Some(step) = steps.get(project.current_step) else { return Ok(()) };
        let note = UserNote::new(&session.user_id, &project.pattern_id, &step.id, content);
        self.notes.upsert_note(&note).await?;
        Ok(())
    }

    async fn require_progress(&self, user_id: &str, pattern_id: &str) -> Result<UserProject> {
        self.progress
            .get_progress(user_id, pattern_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user_project", pattern_id))
    }

    async fn load_steps(&self, pattern_id: &str) -> Result<Vec<Step>> {
        self.patterns
            .get_pattern(pattern_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("pattern", pattern_id))?;
        Ok(self.patterns.list_steps(pattern_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_storage;
    use crate::test_support::FailingProgressStore;

    fn session() -> UserSession {
        UserSession::new("user-1", Some("Ana".into()))
    }

    #[tokio::test]
    async fn start_creates_project_lazily() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);

        let view = service.start(Some(&session()), &pattern_id).await.unwrap();
        let project = view.project.unwrap();
        assert_eq!(project.current_step, 0);
        assert_eq!(project.progress, 0);
        assert!(!project.is_completed);

        // second visit reuses the record
        let again = service.start(Some(&session()), &pattern_id).await.unwrap();
        assert_eq!(again.project.unwrap().id, project.id);
        assert_eq!(storage.get_stats().unwrap().project_count, 1);
    }

    #[tokio::test]
    async fn start_with_no_steps_returns_empty_state() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 0);

        let view = service.start(Some(&session()), &pattern_id).await.unwrap();
        assert!(view.project.is_none());
        assert!(view.steps.is_empty());
        assert_eq!(storage.get_stats().unwrap().project_count, 0);
    }

    #[tokio::test]
    async fn advance_persists_cursor_and_progress() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        service.start(Some(&session()), &pattern_id).await.unwrap();

        let project = service.advance(Some(&session()), &pattern_id, None).await.unwrap();
        assert_eq!(project.current_step, 1);
        assert_eq!(project.progress, 67);

        let stored = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        assert_eq!(stored.current_step, 1);
        assert_eq!(stored.progress, 67);
    }

    #[tokio::test]
    async fn advance_at_last_step_is_a_noop_without_write() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 2);
        service.start(Some(&session()), &pattern_id).await.unwrap();
        service.advance(Some(&session()), &pattern_id, None).await.unwrap();

        let before = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        let project = service.advance(Some(&session()), &pattern_id, None).await.unwrap();
        assert_eq!(project.current_step, 1);

        let after = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        assert_eq!(after.last_updated_at, before.last_updated_at);
    }

    #[tokio::test]
    async fn back_at_first_step_is_a_noop() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        service.start(Some(&session()), &pattern_id).await.unwrap();

        let project = service.back(Some(&session()), &pattern_id, None).await.unwrap();
        assert_eq!(project.current_step, 0);
    }

    #[tokio::test]
    async fn jump_clamps_out_of_range_targets() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 4);
        service.start(Some(&session()), &pattern_id).await.unwrap();

        let project = service.jump_to(Some(&session()), &pattern_id, 99, None).await.unwrap();
        assert_eq!(project.current_step, 3);
        assert_eq!(project.progress, 100);
    }

    #[tokio::test]
    async fn complete_latches_and_survives_navigation() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        service.start(Some(&session()), &pattern_id).await.unwrap();

        let project = service.complete(Some(&session()), &pattern_id).await.unwrap();
        assert!(project.is_completed);
        assert_eq!(project.progress, 100);

        service.back(Some(&session()), &pattern_id, None).await.unwrap();
        let stored = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        assert!(stored.is_completed);
    }

    #[tokio::test]
    async fn navigation_flushes_note_for_departed_step() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        let view = service.start(Some(&session()), &pattern_id).await.unwrap();
        let first_step_id = view.steps[0].id.clone();

        service
            .advance(Some(&session()), &pattern_id, Some("counted 24 stitches"))
            .await
            .unwrap();

        let note = storage.get_note("user-1", &pattern_id, &first_step_id).unwrap().unwrap();
        assert_eq!(note.content, "counted 24 stitches");

        // blank notes are not flushed
        service.advance(Some(&session()), &pattern_id, Some("   ")).await.unwrap();
        assert_eq!(storage.get_stats().unwrap().note_count, 1);
    }

    #[tokio::test]
    async fn unauthenticated_calls_are_rejected() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);

        let err = service.start(None, &pattern_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));
        assert_eq!(storage.get_stats().unwrap().project_count, 0);
    }

    #[tokio::test]
    async fn failed_write_reports_error_and_keeps_stored_cursor() {
        let (storage, _dir) = test_storage::open();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        let failing = std::sync::Arc::new(FailingProgressStore::new(storage.clone()));
        let service = ProjectService::new(
            std::sync::Arc::new(storage.clone()),
            failing.clone(),
            std::sync::Arc::new(storage.clone()),
        );
        service.start(Some(&session()), &pattern_id).await.unwrap();

        failing.fail_updates(true);
        let err = service.advance(Some(&session()), &pattern_id, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));

        // the authoritative record never moved
        let stored = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        assert_eq!(stored.current_step, 0);

        failing.fail_updates(false);
        let project = service.advance(Some(&session()), &pattern_id, None).await.unwrap();
        assert_eq!(project.current_step, 1);
    }

    #[tokio::test]
    async fn stale_cursor_is_clamped_on_start() {
        let (service, storage, _dir) = test_storage::project_service();
        let pattern_id = test_storage::seed_pattern(&storage, 3);
        service.start(Some(&session()), &pattern_id).await.unwrap();

        // simulate a record persisted against a longer, since-shortened step list
        let stored = storage.get_progress("user-1", &pattern_id).unwrap().unwrap();
        storage
            .update_progress(&stored.id, &stitchtrack_core::ProgressUpdate::cursor(9, 100))
            .unwrap();

        let view = service.start(Some(&session()), &pattern_id).await.unwrap();
        assert_eq!(view.project.unwrap().current_step, 2);
    }
}
