//! Key/value settings table

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations;
use crate::Result;

/// Durable string settings shared by every clone
pub struct SettingsStore {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsStore {
    /// Open (or create) the settings file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        tracing::debug!(path = %path.display(), journal_mode = %mode, "Opened settings database");

        Self::prepare(conn)
    }

    /// Non-persistent store, used by tests and throwaway runs
    pub fn in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        migrations::apply(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE key = ?1")?;
        let value = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )?;
        stmt.execute(params![key, value, Utc::now().timestamp()])?;

        tracing::debug!(key, "Stored setting");
        Ok(())
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let store = SettingsStore::in_memory().unwrap();
        assert_eq!(store.get("chat_session_id").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let store = SettingsStore::in_memory().unwrap();
        store.put("chat_session_id", "first").unwrap();
        store.put("chat_session_id", "second").unwrap();

        assert_eq!(
            store.get("chat_session_id").unwrap().as_deref(),
            Some("second")
        );

        let rows: i64 = store
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = SettingsStore::in_memory().unwrap();
        store.clone().put("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chatdesk.db");

        SettingsStore::open(&path)
            .unwrap()
            .put("chat_session_id", "persisted")
            .unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("chat_session_id").unwrap().as_deref(),
            Some("persisted")
        );
    }
}
