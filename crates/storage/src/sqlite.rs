//! SQLite storage implementation

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stitchtrack_core::{
    Category, DifficultyLevel, Favorite, Material, Pattern, Profile, ProgressUpdate, Step,
    UserNote, UserProject,
};

use crate::error::{Result, StorageError};
use crate::migrations;
use crate::types::StorageStats;

#[derive(Clone)]
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
}

fn lock_conn<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e: PoisonError<_>| StorageError::Runtime(format!("database lock poisoned: {e}")))
}

fn parse_ts(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn pattern_from_row(row: &Row<'_>) -> rusqlite::Result<Pattern> {
    Ok(Pattern {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        cover_image_url: row.get(3)?,
        designer_id: row.get(4)?,
        category_id: row.get(5)?,
        difficulty_id: row.get(6)?,
        is_public: row.get(7)?,
        created_at: parse_ts(&row.get::<_, String>(8)?)?,
        updated_at: parse_ts(&row.get::<_, String>(9)?)?,
    })
}

fn step_from_row(row: &Row<'_>) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get(0)?,
        pattern_id: row.get(1)?,
        step_order: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        notes: row.get(5)?,
        stitch_count: row.get(6)?,
        created_at: parse_ts(&row.get::<_, String>(7)?)?,
        updated_at: parse_ts(&row.get::<_, String>(8)?)?,
    })
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    let alternatives: Option<String> = row.get(6)?;
    let alternatives = alternatives
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    Ok(Material {
        id: row.get(0)?,
        pattern_id: row.get(1)?,
        name: row.get(2)?,
        quantity: row.get(3)?,
        brand: row.get(4)?,
        color: row.get(5)?,
        alternatives,
        created_at: parse_ts(&row.get::<_, String>(7)?)?,
        updated_at: parse_ts(&row.get::<_, String>(8)?)?,
    })
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<UserProject> {
    Ok(UserProject {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pattern_id: row.get(2)?,
        current_step: row.get::<_, i64>(3)? as usize,
        progress: row.get::<_, i64>(4)? as u8,
        is_completed: row.get(5)?,
        started_at: parse_ts(&row.get::<_, String>(6)?)?,
        last_updated_at: parse_ts(&row.get::<_, String>(7)?)?,
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<UserNote> {
    Ok(UserNote {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pattern_id: row.get(2)?,
        step_id: row.get(3)?,
        content: row.get(4)?,
        created_at: parse_ts(&row.get::<_, String>(5)?)?,
        updated_at: parse_ts(&row.get::<_, String>(6)?)?,
    })
}

impl Storage {
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(StorageError::Database)?;
        Self::with_connection(conn)
    }

    /// Throwaway in-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::Database)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true).map_err(StorageError::Database)?;
        let storage = Self { conn: Arc::new(Mutex::new(conn)) };

        let conn = lock_conn(&storage.conn)?;
        migrations::run_migrations(&conn)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        drop(conn);

        Ok(storage)
    }

    // ── Patterns ─────────────────────────────────────────────────

    pub fn get_pattern(&self, id: &str) -> Result<Option<Pattern>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, title, description, cover_image_url, designer_id, category_id,
                      difficulty_id, is_public, created_at, updated_at
               FROM patterns WHERE id = ?1"#,
        )?;
        let mut rows = stmt.query_map(params![id], pattern_from_row)?;
        rows.next().transpose().map_err(StorageError::from)
    }

    pub fn list_patterns(&self, public_only: bool, limit: usize) -> Result<Vec<Pattern>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, title, description, cover_image_url, designer_id, category_id,
                      difficulty_id, is_public, created_at, updated_at
               FROM patterns
               WHERE (?1 = 0 OR is_public = 1)
               ORDER BY created_at DESC
               LIMIT ?2"#,
        )?;
        let rows = stmt.query_map(params![public_only, limit as i64], pattern_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn save_pattern(&self, pattern: &Pattern) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO patterns
               (id, title, description, cover_image_url, designer_id, category_id,
                difficulty_id, is_public, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                pattern.id,
                pattern.title,
                pattern.description,
                pattern.cover_image_url,
                pattern.designer_id,
                pattern.category_id,
                pattern.difficulty_id,
                pattern.is_public,
                pattern.created_at.to_rfc3339(),
                pattern.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Steps ────────────────────────────────────────────────────

    /// Steps for a pattern, ordered by `step_order` ascending. This is the
    /// order the navigator indexes into.
    pub fn list_steps(&self, pattern_id: &str) -> Result<Vec<Step>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, pattern_id, step_order, description, image_url, notes,
                      stitch_count, created_at, updated_at
               FROM steps WHERE pattern_id = ?1
               ORDER BY step_order ASC"#,
        )?;
        let rows = stmt.query_map(params![pattern_id], step_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn save_step(&self, step: &Step) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO steps
               (id, pattern_id, step_order, description, image_url, notes,
                stitch_count, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                step.id,
                step.pattern_id,
                step.step_order,
                step.description,
                step.image_url,
                step.notes,
                step.stitch_count,
                step.created_at.to_rfc3339(),
                step.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Materials ────────────────────────────────────────────────

    pub fn list_materials(&self, pattern_id: &str) -> Result<Vec<Material>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, pattern_id, name, quantity, brand, color, alternatives,
                      created_at, updated_at
               FROM materials WHERE pattern_id = ?1
               ORDER BY name ASC"#,
        )?;
        let rows = stmt.query_map(params![pattern_id], material_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn save_material(&self, material: &Material) -> Result<()> {
        let alternatives = material
            .alternatives
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO materials
               (id, pattern_id, name, quantity, brand, color, alternatives,
                created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                material.id,
                material.pattern_id,
                material.name,
                material.quantity,
                material.brand,
                material.color,
                alternatives,
                material.created_at.to_rfc3339(),
                material.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Progress ─────────────────────────────────────────────────

    pub fn get_progress(&self, user_id: &str, pattern_id: &str) -> Result<Option<UserProject>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, user_id, pattern_id, current_step, progress, is_completed,
                      started_at, last_updated_at
               FROM user_projects WHERE user_id = ?1 AND pattern_id = ?2"#,
        )?;
        let mut rows = stmt.query_map(params![user_id, pattern_id], project_from_row)?;
        rows.next().transpose().map_err(StorageError::from)
    }

    /// Plain INSERT: a second record for the same (user, pattern) pair hits
    /// the unique index and surfaces as `Duplicate`.
    pub fn create_progress(&self, project: &UserProject) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT INTO user_projects
               (id, user_id, pattern_id, current_step, progress, is_completed,
                started_at, last_updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                project.id,
                project.user_id,
                project.pattern_id,
                project.current_step as i64,
                project.progress as i64,
                project.is_completed,
                project.started_at.to_rfc3339(),
                project.last_updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn update_progress(&self, id: &str, update: &ProgressUpdate) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        let changed = conn.execute(
            r#"UPDATE user_projects SET
                 current_step = COALESCE(?1, current_step),
                 progress = COALESCE(?2, progress),
                 is_completed = COALESCE(?3, is_completed),
                 last_updated_at = ?4
               WHERE id = ?5"#,
            params![
                update.current_step.map(|v| v as i64),
                update.progress.map(i64::from),
                update.is_completed,
                update.last_updated_at.to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "user_project", id: id.to_owned() });
        }
        Ok(())
    }

    // ── Notes ────────────────────────────────────────────────────

    pub fn get_note(
        &self,
        user_id: &str,
        pattern_id: &str,
        step_id: &str,
    ) -> Result<Option<UserNote>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, user_id, pattern_id, step_id, content, created_at, updated_at
               FROM user_notes WHERE user_id = ?1 AND pattern_id = ?2 AND step_id = ?3"#,
        )?;
        let mut rows = stmt.query_map(params![user_id, pattern_id, step_id], note_from_row)?;
        rows.next().transpose().map_err(StorageError::from)
    }

    /// Upsert keyed on (user, pattern, step): an existing row keeps its id
    /// and `created_at`, only content and `updated_at` change.
    pub fn upsert_note(&self, note: &UserNote) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT INTO user_notes
               (id, user_id, pattern_id, step_id, content, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(user_id, pattern_id, step_id) DO UPDATE SET
                 content = excluded.content,
                 updated_at = excluded.updated_at"#,
            params![
                note.id,
                note.user_id,
                note.pattern_id,
                note.step_id,
                note.content,
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Favorites ────────────────────────────────────────────────

    pub fn is_favorited(&self, user_id: &str, pattern_id: &str) -> Result<bool> {
        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND pattern_id = ?2",
            params![user_id, pattern_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Idempotent: re-favoriting an already-favorited pattern is a no-op
    /// rather than a constraint error.
    pub fn add_favorite(&self, favorite: &Favorite) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR IGNORE INTO favorites (id, user_id, pattern_id, created_at)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![
                favorite.id,
                favorite.user_id,
                favorite.pattern_id,
                favorite.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub fn remove_favorite(&self, user_id: &str, pattern_id: &str) -> Result<bool> {
        let conn = lock_conn(&self.conn)?;
        let deleted = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND pattern_id = ?2",
            params![user_id, pattern_id],
        )?;
        Ok(deleted > 0)
    }

    // ── Catalog lookups ──────────────────────────────────────────

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"SELECT id, name, slug, description, icon, created_at, updated_at
               FROM categories ORDER BY name ASC"#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
                description: row.get(3)?,
                icon: row.get(4)?,
                created_at: parse_ts(&row.get::<_, String>(5)?)?,
                updated_at: parse_ts(&row.get::<_, String>(6)?)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn save_category(&self, category: &Category) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO categories
               (id, name, slug, description, icon, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            params![
                category.id,
                category.name,
                category.slug,
                category.description,
                category.icon,
                category.created_at.to_rfc3339(),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_difficulty_levels(&self) -> Result<Vec<DifficultyLevel>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at FROM difficulty_levels ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DifficultyLevel {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                created_at: parse_ts(&row.get::<_, String>(3)?)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(StorageError::from)
    }

    pub fn save_difficulty_level(&self, level: &DifficultyLevel) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO difficulty_levels (id, name, description, created_at)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![level.id, level.name, level.description, level.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    // ── Profiles ─────────────────────────────────────────────────

    pub fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, name, avatar_url, created_at, updated_at FROM profiles WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], |row| {
            Ok(Profile {
                id: row.get(0)?,
                name: row.get(1)?,
                avatar_url: row.get(2)?,
                created_at: parse_ts(&row.get::<_, String>(3)?)?,
                updated_at: parse_ts(&row.get::<_, String>(4)?)?,
            })
        })?;
        rows.next().transpose().map_err(StorageError::from)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            r#"INSERT OR REPLACE INTO profiles (id, name, avatar_url, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                profile.id,
                profile.name,
                profile.avatar_url,
                profile.created_at.to_rfc3339(),
                profile.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Stats ────────────────────────────────────────────────────

    pub fn get_stats(&self) -> Result<StorageStats> {
        let conn = lock_conn(&self.conn)?;
        let count = |table: &str| -> Result<usize> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(StorageStats {
            pattern_count: count("patterns")?,
            step_count: count("steps")?,
            project_count: count("user_projects")?,
            note_count: count("user_notes")?,
            favorite_count: count("favorites")?,
        })
    }
}
