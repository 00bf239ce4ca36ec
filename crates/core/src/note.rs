//! Per-step user notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text note a user keeps against one step of one pattern.
///
/// At most one row exists per (user, pattern, step); saves are upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserNote {
    pub id: String,
    pub user_id: String,
    pub pattern_id: String,
    pub step_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserNote {
    pub fn new(
        user_id: impl Into<String>,
        pattern_id: impl Into<String>,
        step_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            pattern_id: pattern_id.into(),
            step_id: step_id.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Local edit buffer for one step's note.
///
/// Edits touch only the buffer; nothing persists until the content is
/// flushed. [`take_flush`] hands out dirty non-blank content exactly once,
/// so leaving a step saves pending edits instead of silently dropping them,
/// and blank edits are never written.
///
/// [`take_flush`]: Self::take_flush
#[derive(Debug, Clone, Default)]
pub struct NoteBuffer {
    content: String,
    dirty: bool,
}

impl NoteBuffer {
    /// Buffer seeded with stored content (empty string when no note exists).
    pub fn load(content: impl Into<String>) -> Self {
        Self { content: content.into(), dirty: false }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    /// Pending content to persist, or `None` when the buffer is clean or
    /// blank. Clears the dirty flag, so a successful flush is not repeated.
    pub fn take_flush(&mut self) -> Option<String> {
        if !self.dirty || self.content.trim().is_empty() {
            return None;
        }
        self.dirty = false;
        Some(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_buffer_flushes_nothing() {
        let mut buf = NoteBuffer::load("stored note");
        assert!(!buf.is_dirty());
        assert_eq!(buf.take_flush(), None);
    }

    #[test]
    fn dirty_content_flushes_once() {
        let mut buf = NoteBuffer::load("");
        buf.edit("tension too tight here");
        assert!(buf.is_dirty());
        assert_eq!(buf.take_flush().as_deref(), Some("tension too tight here"));
        // flushed: a second take yields nothing
        assert_eq!(buf.take_flush(), None);
        assert_eq!(buf.content(), "tension too tight here");
    }

    #[test]
    fn blank_edits_are_never_flushed() {
        let mut buf = NoteBuffer::load("old");
        buf.edit("   \n");
        assert!(buf.is_dirty());
        assert_eq!(buf.take_flush(), None);
    }
}
