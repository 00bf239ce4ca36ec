//! Caller identity.

use serde::{Deserialize, Serialize};

/// Identity of the user performing an operation.
///
/// Passed explicitly into every service call that needs one, never held as
/// ambient global state. Operations requiring identity take
/// `Option<&UserSession>` and reject `None` before touching storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        Self { user_id: user_id.into(), display_name }
    }
}
