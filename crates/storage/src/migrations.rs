//! Database migrations

use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 2;

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = match conn.prepare(&sql) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let rows = match stmt.query_map([], |row| row.get::<_, String>(1)) {
        Ok(r) => r,
        Err(_) => return false,
    };
    for name in rows.flatten() {
        if name == column {
            return true;
        }
    }
    false
}

fn add_column_if_not_exists(
    conn: &Connection,
    table: &str,
    column: &str,
    col_type: &str,
) -> Result<(), rusqlite::Error> {
    if !column_exists(conn, table, column) {
        let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, col_type);
        conn.execute(&sql, [])?;
    }
    Ok(())
}

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        "Database schema version: {} (target: {})",
        current_version,
        SCHEMA_VERSION
    );

    if current_version < 1 {
        tracing::info!("Running migration v1: initial schema");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT,
                icon TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS difficulty_levels (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT,
                avatar_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS patterns (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                cover_image_url TEXT,
                designer_id TEXT REFERENCES profiles(id),
                category_id TEXT REFERENCES categories(id),
                difficulty_id TEXT REFERENCES difficulty_levels(id),
                is_public INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS steps (
                id TEXT PRIMARY KEY,
                pattern_id TEXT NOT NULL REFERENCES patterns(id),
                step_order INTEGER NOT NULL,
                description TEXT NOT NULL,
                image_url TEXT,
                notes TEXT,
                stitch_count INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(pattern_id, step_order)
            );

            CREATE TABLE IF NOT EXISTS materials (
                id TEXT PRIMARY KEY,
                pattern_id TEXT NOT NULL REFERENCES patterns(id),
                name TEXT NOT NULL,
                quantity TEXT NOT NULL,
                brand TEXT,
                color TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_projects (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                pattern_id TEXT NOT NULL REFERENCES patterns(id),
                current_step INTEGER NOT NULL DEFAULT 0,
                progress INTEGER NOT NULL DEFAULT 0 CHECK(progress BETWEEN 0 AND 100),
                is_completed INTEGER NOT NULL DEFAULT 0,
                started_at TEXT NOT NULL,
                last_updated_at TEXT NOT NULL,
                UNIQUE(user_id, pattern_id)
            );

            CREATE TABLE IF NOT EXISTS user_notes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                pattern_id TEXT NOT NULL REFERENCES patterns(id),
                step_id TEXT NOT NULL REFERENCES steps(id),
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, pattern_id, step_id)
            );

            CREATE TABLE IF NOT EXISTS favorites (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                pattern_id TEXT NOT NULL REFERENCES patterns(id),
                created_at TEXT NOT NULL,
                UNIQUE(user_id, pattern_id)
            );

            CREATE INDEX IF NOT EXISTS idx_steps_pattern ON steps(pattern_id);
            CREATE INDEX IF NOT EXISTS idx_materials_pattern ON materials(pattern_id);
            CREATE INDEX IF NOT EXISTS idx_projects_user ON user_projects(user_id);
            CREATE INDEX IF NOT EXISTS idx_notes_user ON user_notes(user_id);
            CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id);
            CREATE INDEX IF NOT EXISTS idx_patterns_category ON patterns(category_id);
            "#,
        )?;
    }

    if current_version < 2 {
        tracing::info!("Running migration v2: material alternatives");
        add_column_if_not_exists(conn, "materials", "alternatives", "TEXT")?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tracing::info!("Database schema up to date (version {})", SCHEMA_VERSION);

    Ok(())
}
