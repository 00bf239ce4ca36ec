//! Pattern catalog types: patterns, steps, materials, and their lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A craft project definition authored by a designer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub designer_id: Option<String>,
    pub category_id: Option<String>,
    pub difficulty_id: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pattern {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            cover_image_url: None,
            designer_id: None,
            category_id: None,
            difficulty_id: None,
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One ordered instruction unit within a pattern.
///
/// `step_order` is unique per pattern and defines the total order the
/// navigator walks. Steps are immutable from the viewer's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub pattern_id: String,
    pub step_order: u32,
    pub description: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub stitch_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Step {
    pub fn new(pattern_id: impl Into<String>, step_order: u32, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pattern_id: pattern_id.into(),
            step_order,
            description: description.into(),
            image_url: None,
            notes: None,
            stitch_count: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A supply required by a pattern. Read-only from the viewer's side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub pattern_id: String,
    pub name: String,
    pub quantity: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    /// Acceptable substitutes, free-form.
    pub alternatives: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    pub fn new(
        pattern_id: impl Into<String>,
        name: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pattern_id: pattern_id.into(),
            name: name.into(),
            quantity: quantity.into(),
            brand: None,
            color: None,
            alternatives: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public-facing user profile. Backs designer attribution and session lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let now = Utc::now();
        Self { id: id.into(), name, avatar_url: None, created_at: now, updated_at: now }
    }
}
