//! Progress tracking: the per-user project record and the step navigator.
//!
//! The navigator is a pure state machine over an ordered step sequence.
//! Cursor-changing operations return the would-be transition instead of
//! mutating, so callers can persist the move and only `commit` it once the
//! write succeeds. A failed write leaves the in-memory cursor untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's in-progress or completed attempt at following a pattern.
///
/// At most one record exists per (user, pattern) pair; it is created lazily
/// on first visit to the step-by-step view and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProject {
    pub id: String,
    pub user_id: String,
    pub pattern_id: String,
    /// 0-based index into the pattern's ordered step sequence.
    pub current_step: usize,
    /// Derived percentage, 0–100. See [`progress_percent`].
    pub progress: u8,
    pub is_completed: bool,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl UserProject {
    /// Fresh record positioned at the first step.
    pub fn new(user_id: impl Into<String>, pattern_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            pattern_id: pattern_id.into(),
            current_step: 0,
            progress: 0,
            is_completed: false,
            started_at: now,
            last_updated_at: now,
        }
    }
}

/// Partial update applied to a persisted [`UserProject`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub current_step: Option<usize>,
    pub progress: Option<u8>,
    pub is_completed: Option<bool>,
    pub last_updated_at: DateTime<Utc>,
}

impl ProgressUpdate {
    pub fn cursor(index: usize, progress: u8) -> Self {
        Self {
            current_step: Some(index),
            progress: Some(progress),
            is_completed: None,
            last_updated_at: Utc::now(),
        }
    }

    pub fn completion() -> Self {
        Self {
            current_step: None,
            progress: Some(100),
            is_completed: Some(true),
            last_updated_at: Utc::now(),
        }
    }
}

/// Completion percentage for a cursor position.
///
/// Convention: `round((index + 1) / step_count * 100)` — the first step of a
/// three-step pattern already counts as 33%, and the last step reads 100%.
pub fn progress_percent(index: usize, step_count: usize) -> u8 {
    debug_assert!(step_count > 0 && index < step_count);
    let pct = ((index + 1) as f64 / step_count as f64) * 100.0;
    pct.round() as u8
}

/// A cursor transition the caller has not yet committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub index: usize,
    pub progress: u8,
}

/// In-memory cursor over an ordered step list.
///
/// Position and completion are orthogonal: the user can sit at any step
/// index and independently be marked complete. Completion is a latch —
/// nothing unsets it.
#[derive(Debug, Clone)]
pub struct StepNavigator {
    step_count: usize,
    cursor: usize,
    completed: bool,
}

impl StepNavigator {
    /// Builds a navigator over `step_count` steps, restoring a persisted
    /// position if one exists. A stale persisted cursor (the designer removed
    /// steps since the last visit) is clamped into range.
    ///
    /// Returns `None` for zero-step patterns: there is no position to hold,
    /// and callers render an empty state instead of entering the navigator.
    pub fn new(step_count: usize, persisted: Option<&UserProject>) -> Option<Self> {
        if step_count == 0 {
            return None;
        }
        let (cursor, completed) = match persisted {
            Some(p) => (p.current_step.min(step_count - 1), p.is_completed),
            None => (0, false),
        };
        Some(Self { step_count, cursor, completed })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Percentage for the current position; 100 once completed.
    pub fn progress(&self) -> u8 {
        if self.completed {
            100
        } else {
            progress_percent(self.cursor, self.step_count)
        }
    }

    /// Transition to the next step, or `None` at the last step.
    pub fn advance(&self) -> Option<CursorMove> {
        if self.cursor + 1 < self.step_count {
            Some(self.move_to(self.cursor + 1))
        } else {
            None
        }
    }

    /// Transition to the previous step, or `None` at the first step.
    pub fn back(&self) -> Option<CursorMove> {
        if self.cursor > 0 {
            Some(self.move_to(self.cursor - 1))
        } else {
            None
        }
    }

    /// Direct transition (step list side panel). The target is clamped into
    /// range; jumping to the current position is `None` so callers skip the
    /// redundant write.
    pub fn jump_to(&self, index: usize) -> Option<CursorMove> {
        let clamped = index.min(self.step_count - 1);
        if clamped == self.cursor {
            None
        } else {
            Some(self.move_to(clamped))
        }
    }

    /// Applies a transition after the caller persisted it.
    pub fn commit(&mut self, mv: CursorMove) {
        self.cursor = mv.index;
    }

    /// Marks the project complete. Terminal: later navigation never clears it.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    fn move_to(&self, index: usize) -> CursorMove {
        CursorMove { index, progress: progress_percent(index, self.step_count) }
    }
}
