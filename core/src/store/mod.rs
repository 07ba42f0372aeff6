//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine and the runner call store methods and never execute SQL directly.

use crate::error::InsightResult;
use rusqlite::Connection;

mod customer;
mod marketing;
mod targeting;

pub use marketing::MarketingNote;
pub use targeting::TargetingConfig;

pub struct InsightStore {
    conn: Connection,
}

impl InsightStore {
    pub fn open(path: &str) -> InsightResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> InsightResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> InsightResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_user_config.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_marketing_actions.sql"))?;
        Ok(())
    }
}
