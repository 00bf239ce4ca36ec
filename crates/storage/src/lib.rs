//! Storage layer for stitchtrack
//!
//! SQLite-backed persistence for the pattern catalog, per-user progress
//! records, step notes, and favorites. Blocking `rusqlite` calls are exposed
//! through async domain traits via `spawn_blocking`.

mod error;
mod migrations;
mod sqlite;
mod sqlite_async;
pub mod traits;
mod types;

pub use error::{Result, StorageError};
pub use sqlite::Storage;
pub use types::StorageStats;
