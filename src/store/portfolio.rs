//! Personal portfolio persistence: tracked symbols, notes, pattern cards

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};

/// A saved chart-pattern card in the member's gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCard {
    pub name: String,
    pub symbol: String,
    pub note: String,
    pub saved_at: String,
}

#[derive(Debug)]
pub struct PortfolioStore {
    conn: Connection,
}

impl PortfolioStore {
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

    // === Tracked symbols ===

    pub fn load_tracked(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT symbol FROM tracked ORDER BY symbol")?;
        let mut rows = stmt.query([])?;
        let mut out = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let symbol: String = row.get(0)?;
            out.insert(symbol);
        }
        Ok(out)
    }

    pub fn add_tracked(&self, symbol: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO tracked(symbol) VALUES (?1)",
            params![symbol],
        )?;
        Ok(())
    }

    pub fn remove_tracked(&self, symbol: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM tracked WHERE symbol = ?1", params![symbol])?;
        Ok(())
    }

    // === Symbol notes ===

    pub fn load_notes(&self) -> Result<BTreeMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT symbol, note FROM notes ORDER BY symbol")?;
        let mut rows = stmt.query([])?;
        let mut out = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let symbol: String = row.get(0)?;
            let note: String = row.get(1)?;
            out.insert(symbol, note);
        }
        Ok(out)
    }

    pub fn set_note(&self, symbol: &str, note: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notes(symbol, note) VALUES (?1, ?2)
             ON CONFLICT(symbol) DO UPDATE SET note=excluded.note",
            params![symbol, note],
        )?;
        Ok(())
    }

    pub fn remove_note(&self, symbol: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM notes WHERE symbol = ?1", params![symbol])?;
        Ok(())
    }

    // === Pattern gallery ===

    pub fn load_patterns(&self) -> Result<Vec<PatternCard>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, symbol, note, saved_at FROM patterns ORDER BY saved_at DESC, name",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(PatternCard {
                name: row.get(0)?,
                symbol: row.get(1)?,
                note: row.get(2)?,
                saved_at: row.get(3)?,
            });
        }
        Ok(out)
    }

    pub fn save_pattern(&self, name: &str, symbol: &str, note: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
        self.conn.execute(
            "INSERT INTO patterns(name, symbol, note, saved_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                 symbol=excluded.symbol, note=excluded.note, saved_at=excluded.saved_at",
            params![name, symbol, note, stamp],
        )?;
        Ok(())
    }

    pub fn remove_pattern(&self, name: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM patterns WHERE name = ?1", params![name])?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tracked (
                symbol TEXT PRIMARY KEY
            );
            CREATE TABLE IF NOT EXISTS notes (
                symbol TEXT PRIMARY KEY,
                note   TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS patterns (
                name     TEXT PRIMARY KEY,
                symbol   TEXT NOT NULL,
                note     TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_symbols_round_trip() {
        let store = PortfolioStore::open_in_memory().unwrap();
        store.add_tracked("AAPL").unwrap();
        store.add_tracked("AAPL").unwrap();
        store.add_tracked("MSFT").unwrap();
        assert_eq!(store.load_tracked().unwrap().len(), 2);

        store.remove_tracked("AAPL").unwrap();
        assert!(!store.load_tracked().unwrap().contains("AAPL"));
    }

    #[test]
    fn notes_upsert() {
        let store = PortfolioStore::open_in_memory().unwrap();
        store.set_note("AAPL", "gap fill").unwrap();
        store.set_note("AAPL", "gap filled").unwrap();
        assert_eq!(store.load_notes().unwrap()["AAPL"], "gap filled");
    }

    #[test]
    fn patterns_upsert_by_name() {
        let store = PortfolioStore::open_in_memory().unwrap();
        store.save_pattern("bull-flag", "AAPL", "clean flag").unwrap();
        store.save_pattern("bull-flag", "MSFT", "tighter").unwrap();

        let patterns = store.load_patterns().unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].symbol, "MSFT");
    }
}
