//! Dashboard session persistence: the requested-tab parameter
//!
//! This is the sole persisted representation of the navigation state,
//! kept behind the narrow [`TabStore`] seam so the controller itself
//! stays storage-agnostic.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::nav::TabStore;

#[derive(Debug)]
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    pub fn requested_tab(&self) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM session WHERE key = 'tab'")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set_requested_tab(&self, id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO session(key, value) VALUES ('tab', ?1)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![id],
        )?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl TabStore for SessionStore {
    fn requested(&self) -> Option<String> {
        // Read failures fall back to "nothing requested"; the resolver
        // turns that into the fallback tab.
        self.requested_tab().ok().flatten()
    }

    fn set_requested(&mut self, id: &str) -> Result<()> {
        self.set_requested_tab(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_round_trips_and_replaces() {
        let mut store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.requested(), None);

        store.set_requested("courses").unwrap();
        assert_eq!(store.requested(), Some("courses".to_string()));

        store.set_requested("members").unwrap();
        assert_eq!(store.requested(), Some("members".to_string()));
    }
}
