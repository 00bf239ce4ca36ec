pub mod favorites;
pub mod health;
pub mod notes;
pub mod patterns;
pub mod progress;
