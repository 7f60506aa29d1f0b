//! Key-value backend contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the raw get/set surface the store adapter builds on.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set_many` commits all entries in one transaction or none of them.
//! - Every operation checks runtime validity before touching storage.

use crate::db::{open_db, open_db_in_memory};
use crate::store::{RuntimeContext, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Raw persistent key-value contract required by the store adapter.
///
/// This is the seam to the host's storage facility; the bundled
/// implementation is SQLite-backed, and tests may substitute their own.
pub trait KeyValueBackend: Send + Sync {
    /// Reads one value; `None` when the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces all given keys atomically.
    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()>;
}

/// SQLite-backed key-value storage over the `kv` table.
pub struct SqliteKeyValueBackend {
    conn: Mutex<Connection>,
    context: RuntimeContext,
}

impl SqliteKeyValueBackend {
    pub fn new(conn: Connection, context: RuntimeContext) -> Self {
        Self {
            conn: Mutex::new(conn),
            context,
        }
    }

    /// Opens a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>, context: RuntimeContext) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, context))
    }

    /// Opens an in-memory store with migrations applied.
    pub fn open_in_memory(context: RuntimeContext) -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?, context))
    }
}

impl KeyValueBackend for SqliteKeyValueBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.context.ensure_valid()?;

        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        Ok(value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        self.context.ensure_valid()?;

        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now') * 1000)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(())
    }
}
