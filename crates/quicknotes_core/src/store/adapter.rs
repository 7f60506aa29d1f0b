//! Observable store adapter over the key-value backend.
//!
//! # Responsibility
//! - Provide read-all / write-all access to the `notes` and `trash`
//!   collections as typed note lists.
//! - Fan committed changes out to every subscribed observer.
//!
//! # Invariants
//! - A write replaces the full persisted value of each written collection.
//! - Observers are notified after the commit, outside the backend lock, in
//!   the writer's own call.
//! - Writes from one surface are observed in program order; racing
//!   read-modify-write cycles from two surfaces are last-writer-wins (the
//!   lost-update hazard is a documented property of this store).

use crate::model::note::Note;
use crate::store::backend::{KeyValueBackend, SqliteKeyValueBackend};
use crate::store::{Collection, RuntimeContext, StoreError, StoreResult};
use log::info;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Snapshot of both persisted collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub notes: Vec<Note>,
    pub trash: Vec<Note>,
}

/// Whole-collection replacement payload for one commit.
///
/// A collection left as `None` is untouched; providing both commits them
/// atomically in a single transaction.
#[derive(Debug, Clone, Default)]
pub struct StoreWrite {
    pub notes: Option<Vec<Note>>,
    pub trash: Option<Vec<Note>>,
}

impl StoreWrite {
    pub fn notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Some(notes),
            trash: None,
        }
    }

    pub fn trash(trash: Vec<Note>) -> Self {
        Self {
            notes: None,
            trash: Some(trash),
        }
    }

    pub fn both(notes: Vec<Note>, trash: Vec<Note>) -> Self {
        Self {
            notes: Some(notes),
            trash: Some(trash),
        }
    }

    fn is_empty(&self) -> bool {
        self.notes.is_none() && self.trash.is_none()
    }
}

/// Change notification delivered to observers after a commit.
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub collection: Collection,
    pub value: Vec<Note>,
}

/// Observer contract for committed store changes.
///
/// Callbacks run synchronously in the writer's call; implementations must
/// not subscribe or unsubscribe from inside the callback.
pub trait StoreObserver: Send + Sync {
    fn on_store_change(&self, change: &StoreChange);
}

/// Handle returned by [`NoteStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

/// Durable source of truth for both note collections.
///
/// Each surface holds only a transient in-memory copy of what this store
/// returns and must treat it as stale after any change notification.
pub struct NoteStore {
    backend: Box<dyn KeyValueBackend>,
    observers: Mutex<Vec<(ObserverId, Arc<dyn StoreObserver>)>>,
    next_observer: AtomicU64,
}

impl NoteStore {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(1),
        }
    }

    /// Opens a file-backed store owned by `context`.
    pub fn open(path: impl AsRef<Path>, context: RuntimeContext) -> StoreResult<Self> {
        Ok(Self::new(Box::new(SqliteKeyValueBackend::open(
            path, context,
        )?)))
    }

    /// Opens an in-memory store owned by `context`.
    pub fn open_in_memory(context: RuntimeContext) -> StoreResult<Self> {
        Ok(Self::new(Box::new(SqliteKeyValueBackend::open_in_memory(
            context,
        )?)))
    }

    /// Reads both collections; keys never written read as empty lists.
    pub fn read_all(&self) -> StoreResult<Collections> {
        Ok(Collections {
            notes: self.read_collection(Collection::Notes)?,
            trash: self.read_collection(Collection::Trash)?,
        })
    }

    /// Reads one collection.
    pub fn read_collection(&self, collection: Collection) -> StoreResult<Vec<Note>> {
        match self.backend.get(collection.as_key())? {
            Some(raw) => decode_collection(collection, &raw),
            None => Ok(Vec::new()),
        }
    }

    /// Commits the given whole-collection replacements atomically, then
    /// notifies every observer once per written collection.
    pub fn write_all(&self, write: StoreWrite) -> StoreResult<()> {
        if write.is_empty() {
            return Ok(());
        }

        let mut entries: Vec<(&str, String)> = Vec::with_capacity(2);
        let mut changes: Vec<StoreChange> = Vec::with_capacity(2);

        if let Some(notes) = write.notes {
            entries.push((Collection::Notes.as_key(), encode_collection(&notes)?));
            changes.push(StoreChange {
                collection: Collection::Notes,
                value: notes,
            });
        }
        if let Some(trash) = write.trash {
            entries.push((Collection::Trash.as_key(), encode_collection(&trash)?));
            changes.push(StoreChange {
                collection: Collection::Trash,
                value: trash,
            });
        }

        self.backend.set_many(&entries)?;

        info!(
            "event=store_write module=store status=ok collections={}",
            changes
                .iter()
                .map(|change| format!("{}:{}", change.collection, change.value.len()))
                .collect::<Vec<_>>()
                .join(",")
        );

        for change in &changes {
            self.notify(change);
        }

        Ok(())
    }

    /// Registers an observer for every subsequent committed change.
    pub fn subscribe(&self, observer: Arc<dyn StoreObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Removes a previously registered observer; unknown ids are a no-op.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(observer_id, _)| *observer_id != id);
    }

    fn notify(&self, change: &StoreChange) {
        // Snapshot outside the lock so observer callbacks never run while
        // the registry is held.
        let observers: Vec<Arc<dyn StoreObserver>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer.on_store_change(change);
        }
    }
}

fn encode_collection(notes: &[Note]) -> StoreResult<String> {
    serde_json::to_string(notes)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode collection: {err}")))
}

fn decode_collection(collection: Collection, raw: &str) -> StoreResult<Vec<Note>> {
    serde_json::from_str(raw).map_err(|err| {
        StoreError::InvalidData(format!(
            "failed to decode `{collection}` collection: {err}"
        ))
    })
}
