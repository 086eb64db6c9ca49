//! Database schema migrations for the plan database.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: team, jobs and calendars.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS persons (
            name        TEXT PRIMARY KEY,
            daily_hours REAL NOT NULL,
            position    INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jobs (
            id             TEXT PRIMARY KEY,
            position       INTEGER NOT NULL,
            name           TEXT NOT NULL,
            required_hours REAL NOT NULL,
            priority       INTEGER NOT NULL DEFAULT 0,
            assignee       TEXT NOT NULL,
            due_date       TEXT,
            notes          TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS calendars (
            member           TEXT PRIMARY KEY,
            start_date       TEXT NOT NULL,
            working_weekdays TEXT NOT NULL DEFAULT '[0,1,2,3,4]'
        );

        CREATE TABLE IF NOT EXISTS non_working_dates (
            member TEXT NOT NULL,
            date   TEXT NOT NULL,
            PRIMARY KEY (member, date)
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: partial-day unavailability, one row per feed.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS unavailable_hours (
            member TEXT NOT NULL,
            date   TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'manual',
            hours  REAL NOT NULL,
            PRIMARY KEY (member, date, source)
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_assignee ON jobs(assignee);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}
