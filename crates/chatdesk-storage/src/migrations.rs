//! Schema versioning
//!
//! The applied version lives in SQLite's `user_version` header field, so no
//! bookkeeping table is needed.

use rusqlite::Connection;

use crate::Result;

type Step = fn(&Connection) -> rusqlite::Result<()>;

/// Index `i` upgrades a database from version `i` to `i + 1`
const STEPS: &[Step] = &[create_settings];

pub fn apply(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (index, step) in STEPS.iter().enumerate() {
        let target = index as i64 + 1;
        if target <= current {
            continue;
        }

        tracing::info!(from = target - 1, to = target, "Migrating settings schema");
        step(conn)?;
        conn.pragma_update(None, "user_version", target)?;
    }

    Ok(())
}

fn create_settings(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    )
}
