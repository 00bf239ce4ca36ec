//! Per-step note loading and saving.

use std::sync::Arc;

use stitchtrack_core::{UserNote, UserSession};
use stitchtrack_storage::traits::NoteStore;

use crate::error::{require_session, Result, ServiceError};

pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    /// Stored note content for the (user, pattern, step) triple, or the
    /// empty string when the user has not written one.
    pub async fn load(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        step_id: &str,
    ) -> Result<String> {
        let session = require_session(session)?;
        let note = self.notes.get_note(&session.user_id, pattern_id, step_id).await?;
        Ok(note.map(|n| n.content).unwrap_or_default())
    }

    /// Upserts the note for its key triple: one row per triple, content
    /// equal to the last save. Blank content is rejected before any
    /// storage call.
    pub async fn save(
        &self,
        session: Option<&UserSession>,
        pattern_id: &str,
        step_id: &str,
        content: &str,
    ) -> Result<UserNote> {
        let session = require_session(session)?;
        if content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("note content is empty".into()));
        }
        let note = UserNote::new(&session.user_id, pattern_id, step_id, content);
        self.notes.upsert_note(&note).await?;
        // re-read: an upsert against an existing row keeps its id and created_at
        self.notes
            .get_note(&session.user_id, pattern_id, step_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user_note", step_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_storage;

    fn session() -> UserSession {
        UserSession::new("user-1", None)
    }

    #[tokio::test]
    async fn load_missing_note_is_empty_string() {
        let (service, storage, _dir) = test_storage::note_service();
        let pattern_id = test_storage::seed_pattern(&storage, 2);
        let steps = storage.list_steps(&pattern_id).unwrap();

        let content = service.load(Some(&session()), &pattern_id, &steps[0].id).await.unwrap();
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn two_saves_yield_one_row_with_last_content() {
        let (service, storage, _dir) = test_storage::note_service();
        let pattern_id = test_storage::seed_pattern(&storage, 2);
        let steps = storage.list_steps(&pattern_id).unwrap();

        let first =
            service.save(Some(&session()), &pattern_id, &steps[0].id, "row 1 done").await.unwrap();
        let second = service
            .save(Some(&session()), &pattern_id, &steps[0].id, "row 1 and 2 done")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.content, "row 1 and 2 done");
        assert_eq!(storage.get_stats().unwrap().note_count, 1);
    }

    #[tokio::test]
    async fn blank_content_is_rejected_before_storage() {
        let (service, storage, _dir) = test_storage::note_service();
        let pattern_id = test_storage::seed_pattern(&storage, 1);
        let steps = storage.list_steps(&pattern_id).unwrap();

        let err =
            service.save(Some(&session()), &pattern_id, &steps[0].id, "  \n").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(storage.get_stats().unwrap().note_count, 0);
    }

    #[tokio::test]
    async fn anonymous_save_is_rejected() {
        let (service, storage, _dir) = test_storage::note_service();
        let pattern_id = test_storage::seed_pattern(&storage, 1);
        let steps = storage.list_steps(&pattern_id).unwrap();

        let err = service.save(None, &pattern_id, &steps[0].id, "hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));
        assert_eq!(storage.get_stats().unwrap().note_count, 0);
    }
}
