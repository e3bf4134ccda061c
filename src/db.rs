// ==========================================
// AIT CMMS - SQLite connection initialization
// ==========================================
// Single place for PRAGMA behavior and busy_timeout so every
// module opens connections the same way.
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection with the unified configuration applied.
pub fn open_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Create the scheduler's tables if they do not exist.
///
/// Dates are stored as `%Y-%m-%d` text, so lexicographic SQL
/// comparisons match chronological order.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS equipment (
            bfm_equipment_no TEXT PRIMARY KEY,
            description      TEXT NOT NULL DEFAULT '',
            monthly_pm       TEXT,
            annual_pm        TEXT,
            last_monthly_pm  TEXT,
            last_annual_pm   TEXT,
            next_annual_pm   TEXT,
            status           TEXT NOT NULL DEFAULT 'Active'
        );

        CREATE TABLE IF NOT EXISTS pm_completions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            bfm_equipment_no TEXT NOT NULL,
            pm_type          TEXT NOT NULL,
            completion_date  TEXT NOT NULL,
            technician_name  TEXT
        );

        CREATE TABLE IF NOT EXISTS weekly_pm_schedules (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            bfm_equipment_no    TEXT NOT NULL,
            pm_type             TEXT NOT NULL,
            week_start_date     TEXT NOT NULL,
            scheduled_date      TEXT,
            assigned_technician TEXT,
            status              TEXT NOT NULL DEFAULT 'Scheduled'
        );

        CREATE INDEX IF NOT EXISTS idx_pm_completions_bfm_date
            ON pm_completions (bfm_equipment_no, completion_date);
        CREATE INDEX IF NOT EXISTS idx_weekly_schedules_week
            ON weekly_pm_schedules (week_start_date);
        CREATE INDEX IF NOT EXISTS idx_weekly_schedules_bfm_type
            ON weekly_pm_schedules (bfm_equipment_no, pm_type, week_start_date);
        "#,
    )
}
