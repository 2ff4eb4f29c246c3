//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: habits and completions
    r#"
    CREATE TABLE IF NOT EXISTS habits (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL,
        color            TEXT NOT NULL,
        icon             TEXT NOT NULL,
        frequency        TEXT NOT NULL
                         CHECK (frequency IN ('daily', 'weekdays', 'weekends', 'custom')),
        custom_days      JSON,
        reminder         TEXT,
        created_at       DATETIME NOT NULL
    );

    -- One row per (habit, day): presence means done
    CREATE TABLE IF NOT EXISTS habit_completions (
        habit_id         TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        date             TEXT NOT NULL,
        created_at       DATETIME NOT NULL,

        PRIMARY KEY (habit_id, date)
    );

    CREATE INDEX IF NOT EXISTS idx_habits_created ON habits(created_at);
    CREATE INDEX IF NOT EXISTS idx_completions_date ON habit_completions(date);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
