//! Persistent store layer for note collections.
//!
//! # Responsibility
//! - Define the key-value backend contract the core depends on.
//! - Expose the observable store adapter used by all surfaces.
//!
//! # Invariants
//! - Writes are whole-collection replacements, never merges; callers must
//!   read-modify-write the full collection they mutate.
//! - Every committed write notifies all subscribed observers, including the
//!   writer itself.
//! - Once the owning runtime context is invalidated, every store call fails
//!   with `StoreError::ContextInvalidated` until the surface is reloaded.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod adapter;
pub mod backend;

pub use adapter::{
    Collections, NoteStore, ObserverId, StoreChange, StoreObserver, StoreWrite,
};
pub use backend::{KeyValueBackend, SqliteKeyValueBackend};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for persistence and decoding failures.
#[derive(Debug)]
pub enum StoreError {
    /// The owning runtime was torn down mid-operation. Not retryable; the
    /// dependent surface must be reloaded.
    ContextInvalidated,
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContextInvalidated => {
                write!(f, "runtime context invalidated; reload the surface to continue")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted collection data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ContextInvalidated | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One of the two named note collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Active notes, newest first.
    Notes,
    /// Soft-deleted notes, newest first.
    Trash,
}

impl Collection {
    /// Stable key under which the collection is persisted.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Trash => "trash",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// Shared validity flag for the runtime that owns the store.
///
/// Mirrors a host runtime handle: once the host tears the runtime down the
/// flag flips and every subsequent store call fails fast with
/// `ContextInvalidated` instead of touching storage.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    valid: Arc<AtomicBool>,
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self {
            valid: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Marks the owning runtime as torn down. Irreversible.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::SeqCst);
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    /// Fails with `ContextInvalidated` once the runtime is gone.
    pub fn ensure_valid(&self) -> StoreResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(StoreError::ContextInvalidated)
        }
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}
