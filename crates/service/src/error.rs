//! Typed error enum for the service layer.
//!
//! Unifies storage and identity failures into a single error type, enabling
//! callers to match on specific failure modes instead of downcasting opaque
//! `anyhow::Error` boxes. Nothing here is fatal: the HTTP layer maps every
//! variant to a response and the worst user-visible outcome is a stale view.

use stitchtrack_core::UserSession;
use stitchtrack_storage::StorageError;
use thiserror::Error;

/// Service-layer error covering the progress-tracking taxonomy.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, duplicate, transient).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Pattern, step, or progress record referenced by id does not exist.
    /// Surfaced as an empty-state, not a crash.
    #[error("not found: {entity} '{id}'")]
    NotFound { entity: &'static str, id: String },

    /// Action requiring a user identity attempted without one. Raised
    /// before any storage call; no partial state change occurs.
    #[error("sign-in required")]
    Unauthenticated,

    /// Caller provided invalid input (blank note, malformed import).
    /// Rejected before any storage call.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_transient())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}

/// Rejects anonymous callers before anything else runs.
pub fn require_session(session: Option<&UserSession>) -> Result<&UserSession> {
    session.ok_or(ServiceError::Unauthenticated)
}

pub type Result<T> = std::result::Result<T, ServiceError>;
