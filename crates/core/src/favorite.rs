//! Pattern bookmarks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's bookmark of a pattern. Row existence denotes membership:
/// toggling off deletes the row rather than flagging it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub pattern_id: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: impl Into<String>, pattern_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            pattern_id: pattern_id.into(),
            created_at: Utc::now(),
        }
    }
}
