//! Note lifecycle operations.
//!
//! # Responsibility
//! - Implement create / move-to-trash / restore / delete-permanently as
//!   list transforms followed by a full write-back.
//! - Keep both collections consistent through the shared store.
//!
//! # Invariants
//! - A note id never persists in both collections: moves commit both lists
//!   in one atomic write.
//! - Operations on absent ids are no-ops, not errors.
//! - Repeated creates always produce distinct notes; there is no
//!   edit-in-place on persisted notes.

use crate::model::note::{Note, NoteId};
use crate::store::{Collection, NoteStore, StoreResult, StoreWrite};
use log::info;
use std::sync::Arc;

/// Lifecycle facade over the shared note store.
///
/// Every operation re-reads the collections it mutates before writing back,
/// so a stale in-memory mirror on the calling surface never feeds a write.
pub struct NoteLifecycle {
    store: Arc<NoteStore>,
}

impl NoteLifecycle {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    /// Creates a note from opaque rich-text content and prepends it to the
    /// active collection.
    pub fn create_note(&self, content: impl Into<String>) -> StoreResult<Note> {
        let note = Note::new(content);

        let mut notes = self.store.read_collection(Collection::Notes)?;
        notes.insert(0, note.clone());
        self.store.write_all(StoreWrite::notes(notes))?;

        info!(
            "event=note_create module=lifecycle status=ok id={}",
            note.id
        );
        Ok(note)
    }

    /// Moves one note from the active collection to the trash.
    ///
    /// Both collections land in a single write so an interruption can never
    /// leave the note in neither list.
    pub fn move_to_trash(&self, id: &NoteId) -> StoreResult<()> {
        let mut collections = self.store.read_all()?;
        let Some(note) = remove_by_id(&mut collections.notes, id) else {
            return Ok(());
        };
        collections.trash.insert(0, note);
        self.store
            .write_all(StoreWrite::both(collections.notes, collections.trash))?;

        info!("event=note_trash module=lifecycle status=ok id={id}");
        Ok(())
    }

    /// Moves one note from the trash back to the head of the active
    /// collection, fields unchanged.
    pub fn restore_from_trash(&self, id: &NoteId) -> StoreResult<()> {
        let mut collections = self.store.read_all()?;
        let Some(note) = remove_by_id(&mut collections.trash, id) else {
            return Ok(());
        };
        collections.notes.insert(0, note);
        self.store
            .write_all(StoreWrite::both(collections.notes, collections.trash))?;

        info!("event=note_restore module=lifecycle status=ok id={id}");
        Ok(())
    }

    /// Removes one note from the trash irrecoverably.
    pub fn delete_permanently(&self, id: &NoteId) -> StoreResult<()> {
        let mut trash = self.store.read_collection(Collection::Trash)?;
        if remove_by_id(&mut trash, id).is_none() {
            return Ok(());
        }
        self.store.write_all(StoreWrite::trash(trash))?;

        info!("event=note_purge module=lifecycle status=ok id={id}");
        Ok(())
    }
}

fn remove_by_id(list: &mut Vec<Note>, id: &NoteId) -> Option<Note> {
    let index = list.iter().position(|note| &note.id == id)?;
    Some(list.remove(index))
}
