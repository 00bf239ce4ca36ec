//! Storage-level reporting types.

use serde::{Deserialize, Serialize};

/// Row counts across the database, for the CLI `stats` command and the
/// health endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StorageStats {
    pub pattern_count: usize,
    pub step_count: usize,
    pub project_count: usize,
    pub note_count: usize,
    pub favorite_count: usize,
}
