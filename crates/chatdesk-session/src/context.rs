//! Active session pointer
//!
//! Initialized once from local storage at startup and mutated only through
//! the synchronizer. Every change is written back under [`ACTIVE_SESSION_KEY`].

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use chatdesk_storage::SettingsStore;

use crate::Result;

/// Settings key holding the last active session id
pub const ACTIVE_SESSION_KEY: &str = "chat_session_id";

pub struct ActiveSession {
    id: Arc<RwLock<String>>,
    db: SettingsStore,
}

impl ActiveSession {
    /// Read the persisted pointer, minting and saving a fresh id on first run
    pub fn restore(db: SettingsStore) -> Result<Self> {
        let id = match db.get(ACTIVE_SESSION_KEY)? {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let id = Uuid::new_v4().to_string();
                db.put(ACTIVE_SESSION_KEY, &id)?;
                tracing::info!(session_id = %id, "No stored session, minted a new id");
                id
            }
        };

        Ok(Self {
            id: Arc::new(RwLock::new(id)),
            db,
        })
    }

    pub fn id(&self) -> String {
        self.id.read().clone()
    }

    pub fn is(&self, session_id: &str) -> bool {
        *self.id.read() == session_id
    }

    /// Point at `session_id`. The in-memory value changes even if the write fails.
    pub fn set(&self, session_id: &str) -> Result<()> {
        *self.id.write() = session_id.to_string();
        self.db.put(ACTIVE_SESSION_KEY, session_id)?;
        Ok(())
    }
}

impl Clone for ActiveSession {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            db: self.db.clone(),
        }
    }
}
