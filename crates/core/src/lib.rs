//! Core types for stitchtrack
//!
//! This crate contains domain types shared across all other crates:
//! the pattern catalog, the progress state machine, and the stitch counter.

mod catalog;
mod counter;
mod favorite;
mod note;
mod project;
mod session;

pub use catalog::*;
pub use counter::*;
pub use favorite::*;
pub use note::*;
pub use project::*;
pub use session::*;
