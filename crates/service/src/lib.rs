//! Service layer for stitchtrack
//!
//! Centralizes business logic between HTTP handlers / CLI and storage.
//! Every operation that needs an identity takes the session explicitly;
//! there is no ambient current-user state.

mod error;
mod favorite_service;
mod note_service;
mod pattern_service;
mod project_service;

#[cfg(test)]
mod test_support;

pub use error::{require_session, Result, ServiceError};
pub use favorite_service::FavoriteService;
pub use note_service::NoteService;
pub use pattern_service::{PatternImport, PatternService};
pub use project_service::{ProjectService, ProjectView};
