//! Member and payment records
//!
//! The stand-in for the platform's hosted member database. The worker
//! thread owns the connection; the UI only ever sees loaded rows.
//!
//! Client-side role checks gate the admin commands for UX only. A
//! deployment against a real hosted service must authorize every write
//! here server-side as well.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};

use crate::domain::access::{MembershipTier, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub name: String,
    pub role: Role,
    pub tier: MembershipTier,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: i64,
    pub member: String,
    pub amount_cents: i64,
    pub currency: String,
    pub state: String,
    pub paid_at: String,
}

impl PaymentRecord {
    pub fn amount_label(&self) -> String {
        format!(
            "{}.{:02} {}",
            self.amount_cents / 100,
            self.amount_cents % 100,
            self.currency
        )
    }
}

#[derive(Debug)]
pub struct MemberStore {
    conn: Connection,
}

impl MemberStore {
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

    pub fn lookup(&self, name: &str) -> Result<Option<MemberRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, role, tier, joined_at FROM members WHERE name = ?1")?;
        let mut rows = stmt.query(params![name])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::member_from_row(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ))),
            None => Ok(None),
        }
    }

    /// Insert a member if absent; an existing row wins.
    pub fn ensure_member(&self, name: &str, role: Role, tier: MembershipTier) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO members(name, role, tier, joined_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, role.id(), tier.id(), today()],
        )?;
        Ok(())
    }

    pub fn invite(&self, name: &str) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO members(name, role, tier, joined_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, Role::User.id(), MembershipTier::Free.id(), today()],
        )?;
        Ok(inserted > 0)
    }

    pub fn promote(&self, name: &str, role: Role) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE members SET role = ?2 WHERE name = ?1",
            params![name, role.id()],
        )?;
        Ok(updated > 0)
    }

    pub fn load_members(&self) -> Result<Vec<MemberRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, role, tier, joined_at FROM members ORDER BY name")?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(Self::member_from_row(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ));
        }
        Ok(out)
    }

    pub fn record_payment(&self, member: &str, amount_cents: i64, currency: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO payments(member, amount_cents, currency, state, paid_at)
             VALUES (?1, ?2, ?3, 'settled', ?4)",
            params![member, amount_cents, currency, today()],
        )?;
        Ok(())
    }

    pub fn load_payments(&self) -> Result<Vec<PaymentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, member, amount_cents, currency, state, paid_at
             FROM payments ORDER BY paid_at DESC, id DESC",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(PaymentRecord {
                id: row.get(0)?,
                member: row.get(1)?,
                amount_cents: row.get(2)?,
                currency: row.get(3)?,
                state: row.get(4)?,
                paid_at: row.get(5)?,
            });
        }
        Ok(out)
    }

    fn member_from_row(name: String, role: String, tier: String, joined_at: String) -> MemberRecord {
        MemberRecord {
            name,
            role: Role::parse(&role).unwrap_or(Role::User),
            tier: MembershipTier::parse(&tier).unwrap_or(MembershipTier::Free),
            joined_at,
        }
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS members (
                name      TEXT PRIMARY KEY,
                role      TEXT NOT NULL,
                tier      TEXT NOT NULL,
                joined_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS payments (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                member       TEXT NOT NULL,
                amount_cents INTEGER NOT NULL,
                currency     TEXT NOT NULL,
                state        TEXT NOT NULL,
                paid_at      TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_member_keeps_existing_row() {
        let store = MemberStore::open_in_memory().unwrap();
        store
            .ensure_member("dana", Role::Admin, MembershipTier::Premium)
            .unwrap();
        store
            .ensure_member("dana", Role::User, MembershipTier::Free)
            .unwrap();

        let dana = store.lookup("dana").unwrap().unwrap();
        assert_eq!(dana.role, Role::Admin);
        assert_eq!(dana.tier, MembershipTier::Premium);
    }

    #[test]
    fn invite_then_promote() {
        let store = MemberStore::open_in_memory().unwrap();
        assert!(store.invite("kim").unwrap());
        assert!(!store.invite("kim").unwrap());

        assert!(store.promote("kim", Role::Moderator).unwrap());
        assert!(!store.promote("ghost", Role::Moderator).unwrap());
        assert_eq!(
            store.lookup("kim").unwrap().unwrap().role,
            Role::Moderator
        );
    }

    #[test]
    fn payments_round_trip() {
        let store = MemberStore::open_in_memory().unwrap();
        store.record_payment("kim", 4990, "USD").unwrap();
        store.record_payment("kim", 9900, "USD").unwrap();

        let payments = store.load_payments().unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount_label(), "99.00 USD");
        assert_eq!(payments[0].state, "settled");
    }
}
