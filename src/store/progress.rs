//! Completed-chapter persistence
//!
//! The progress tracker itself never touches storage; the app writes
//! completions through here when a session mutates, and hydrates new
//! sessions from here.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct ProgressStore {
    conn: Connection,
}

impl ProgressStore {
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

    pub fn load_completed(&self, course_id: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT chapter_id FROM completed WHERE course_id = ?1")?;
        let mut rows = stmt.query(params![course_id])?;
        let mut out = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let chapter: String = row.get(0)?;
            out.insert(chapter);
        }
        Ok(out)
    }

    pub fn load_all(&self) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT course_id, chapter_id FROM completed ORDER BY course_id")?;
        let mut rows = stmt.query([])?;
        let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let course: String = row.get(0)?;
            let chapter: String = row.get(1)?;
            out.entry(course).or_default().insert(chapter);
        }
        Ok(out)
    }

    /// Record completions for a course. Already-recorded chapters are
    /// left untouched, so this is safe to call with the full set.
    pub fn record_completed<'a>(
        &self,
        course_id: &str,
        chapters: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        for chapter in chapters {
            self.conn.execute(
                "INSERT OR IGNORE INTO completed(course_id, chapter_id, completed_at)
                 VALUES (?1, ?2, ?3)",
                params![course_id, chapter, stamp],
            )?;
        }
        Ok(())
    }

    pub fn last_course(&self) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM meta WHERE key = 'last_course'")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set_last_course(&self, course_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO meta(key, value) VALUES ('last_course', ?1)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![course_id],
        )?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS completed (
                course_id    TEXT NOT NULL,
                chapter_id   TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                PRIMARY KEY (course_id, chapter_id)
            );
            CREATE TABLE IF NOT EXISTS meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_idempotent() {
        let store = ProgressStore::open_in_memory().unwrap();
        store.record_completed("basics", ["c1", "c2"]).unwrap();
        store.record_completed("basics", ["c2"]).unwrap();

        let completed = store.load_completed("basics").unwrap();
        assert_eq!(completed.len(), 2);
        assert!(completed.contains("c1"));
    }

    #[test]
    fn load_all_groups_by_course() {
        let store = ProgressStore::open_in_memory().unwrap();
        store.record_completed("basics", ["c1"]).unwrap();
        store.record_completed("risk", ["r1", "r2"]).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["risk"].len(), 2);
    }

    #[test]
    fn last_course_round_trips() {
        let store = ProgressStore::open_in_memory().unwrap();
        assert_eq!(store.last_course().unwrap(), None);
        store.set_last_course("basics").unwrap();
        store.set_last_course("risk").unwrap();
        assert_eq!(store.last_course().unwrap(), Some("risk".to_string()));
    }
}
