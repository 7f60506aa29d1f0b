//! Sidebar surface: list rendering, search, and note actions.
//!
//! # Responsibility
//! - Mirror both collections in memory, refreshed on load and on every
//!   store change notification.
//! - Produce a full render model of the active tab's filtered list.
//! - Invoke lifecycle operations for user actions.
//!
//! # Invariants
//! - Mirrors are disposable snapshots; every change notification replaces
//!   them wholesale.
//! - Rendering is a full rebuild, never an incremental patch.
//! - Blank editor content (including the empty-editor sentinel) is never
//!   saved.

use crate::message::router::MessageRouter;
use crate::message::{Message, SurfaceId};
use crate::model::note::{Note, NoteId};
use crate::search::text::{filter_notes, plain_text};
use crate::service::lifecycle::NoteLifecycle;
use crate::store::{StoreChange, StoreError, StoreObserver};
use chrono::{DateTime, NaiveDate, Utc};
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};

/// Editor output for a cleared editor; treated as blank content.
const EMPTY_EDITOR_SENTINEL: &str = "<p><br></p>";

/// MIME type of exported note files.
pub const EXPORT_MIME: &str = "text/plain";

/// Sidebar tabs, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Notes,
    Trash,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Trash => "trash",
        }
    }
}

/// Per-card action affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    CopyText,
    ExportText,
    MoveToTrash,
    Restore,
    DeletePermanently,
}

const ACTIVE_ACTIONS: &[NoteAction] = &[
    NoteAction::CopyText,
    NoteAction::ExportText,
    NoteAction::MoveToTrash,
];
const TRASH_ACTIONS: &[NoteAction] = &[NoteAction::Restore, NoteAction::DeletePermanently];

/// One rendered note card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    /// Opaque HTML for the host's rich-text rendering.
    pub content_html: String,
    /// Plain-text rendering, shared by search, copy, and export.
    pub plain_text: String,
    pub created_at: DateTime<Utc>,
    pub actions: &'static [NoteAction],
}

/// Full redraw of the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRender {
    pub tab: Tab,
    pub cards: Vec<NoteCard>,
    /// Placeholder text shown instead of an empty list.
    pub empty_message: Option<String>,
}

/// Exported download payload for one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

/// The copy-to-clipboard path failed; the user may retry manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardUnavailable;

impl Display for ClipboardUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "clipboard is unavailable")
    }
}

impl Error for ClipboardUnavailable {}

/// Host clipboard seam used by the copy action.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<(), ClipboardUnavailable>;
}

/// User-surfaced sidebar failures; everything else is logged and swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarError {
    /// Host runtime torn down; only a reload recovers.
    ContextInvalidated,
    ClipboardUnavailable,
}

impl SidebarError {
    /// Notice text shown to the user.
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::ContextInvalidated => {
                "The extension was reloaded. Refresh this page to continue."
            }
            Self::ClipboardUnavailable => "Failed to copy. Please try again.",
        }
    }
}

impl Display for SidebarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_notice())
    }
}

impl Error for SidebarError {}

struct ViewState {
    all_notes: Vec<Note>,
    all_trash: Vec<Note>,
    active_tab: Tab,
    search: String,
}

/// Sidebar view model over the shared store.
///
/// Wrap in an `Arc` and pass to [`crate::store::NoteStore::subscribe`] so
/// the mirrors refresh on every committed change, including this view's own
/// writes.
pub struct SidebarView {
    lifecycle: NoteLifecycle,
    state: Mutex<ViewState>,
}

impl SidebarView {
    pub fn new(lifecycle: NoteLifecycle) -> Self {
        Self {
            lifecycle,
            state: Mutex::new(ViewState {
                all_notes: Vec::new(),
                all_trash: Vec::new(),
                active_tab: Tab::Notes,
                search: String::new(),
            }),
        }
    }

    /// Initial load of both mirrors from the store.
    pub fn load(&self) -> Result<(), SidebarError> {
        let collections = match self.lifecycle.store().read_all() {
            Ok(collections) => collections,
            Err(err) => return swallow_store_error("sidebar_load", err),
        };

        let mut state = self.lock_state();
        state.all_notes = collections.notes;
        state.all_trash = collections.trash;
        Ok(())
    }

    pub fn active_tab(&self) -> Tab {
        self.lock_state().active_tab
    }

    pub fn set_active_tab(&self, tab: Tab) {
        self.lock_state().active_tab = tab;
    }

    pub fn set_search(&self, query: &str) {
        self.lock_state().search = query.to_string();
    }

    /// Full redraw of the active tab's filtered list.
    pub fn render(&self) -> SidebarRender {
        let state = self.lock_state();
        let (list, actions) = match state.active_tab {
            Tab::Notes => (&state.all_notes, ACTIVE_ACTIONS),
            Tab::Trash => (&state.all_trash, TRASH_ACTIONS),
        };

        let cards: Vec<NoteCard> = filter_notes(list, &state.search)
            .into_iter()
            .map(|note| NoteCard {
                id: note.id.clone(),
                content_html: note.content.clone(),
                plain_text: plain_text(&note.content),
                created_at: note.created_at,
                actions,
            })
            .collect();

        let empty_message = cards
            .is_empty()
            .then(|| format!("No {} found.", state.active_tab.label()));

        SidebarRender {
            tab: state.active_tab,
            cards,
            empty_message,
        }
    }

    /// Saves editor output as a new note; blank content is rejected
    /// without touching the store.
    pub fn save_note(&self, content_html: &str) -> Result<Option<Note>, SidebarError> {
        let trimmed = content_html.trim();
        if trimmed.is_empty() || trimmed == EMPTY_EDITOR_SENTINEL {
            return Ok(None);
        }

        match self.lifecycle.create_note(trimmed) {
            Ok(note) => Ok(Some(note)),
            Err(err) => swallow_store_error("sidebar_save", err).map(|()| None),
        }
    }

    pub fn move_to_trash(&self, id: &NoteId) -> Result<(), SidebarError> {
        match self.lifecycle.move_to_trash(id) {
            Ok(()) => Ok(()),
            Err(err) => swallow_store_error("sidebar_trash", err),
        }
    }

    pub fn restore_from_trash(&self, id: &NoteId) -> Result<(), SidebarError> {
        match self.lifecycle.restore_from_trash(id) {
            Ok(()) => Ok(()),
            Err(err) => swallow_store_error("sidebar_restore", err),
        }
    }

    pub fn delete_permanently(&self, id: &NoteId) -> Result<(), SidebarError> {
        match self.lifecycle.delete_permanently(id) {
            Ok(()) => Ok(()),
            Err(err) => swallow_store_error("sidebar_purge", err),
        }
    }

    /// Copies one active note's plain text through the host clipboard.
    ///
    /// Returns the copied text, or `None` when the id is no longer mirrored.
    pub fn copy_note_text(
        &self,
        id: &NoteId,
        clipboard: &dyn ClipboardSink,
    ) -> Result<Option<String>, SidebarError> {
        let Some(text) = self.find_active_plain_text(id) else {
            return Ok(None);
        };

        clipboard
            .write_text(&text)
            .map_err(|ClipboardUnavailable| SidebarError::ClipboardUnavailable)?;
        Ok(Some(text))
    }

    /// Builds the download payload for one active note.
    ///
    /// `on` is the export date stamped into the filename.
    pub fn export_note(&self, id: &NoteId, on: NaiveDate) -> Option<ExportFile> {
        let body = self.find_active_plain_text(id)?;
        Some(ExportFile {
            filename: format!("note_{}.txt", on.format("%Y-%m-%d")),
            mime: EXPORT_MIME,
            body,
        })
    }

    /// Close button: routed via the background, which re-targets the page.
    pub fn close(&self, router: &MessageRouter) {
        if let Err(err) = router.send(SurfaceId::Background, Message::CloseSidebar) {
            warn!("event=sidebar_close module=sidebar status=error error={err}");
        }
    }

    fn find_active_plain_text(&self, id: &NoteId) -> Option<String> {
        let state = self.lock_state();
        state
            .all_notes
            .iter()
            .find(|note| &note.id == id)
            .map(|note| plain_text(&note.content))
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreObserver for SidebarView {
    fn on_store_change(&self, _change: &StoreChange) {
        // Any committed change makes the mirrors stale; reload both.
        if let Err(err) = self.load() {
            warn!("event=sidebar_refresh module=sidebar status=error error={err}");
        }
    }
}

fn swallow_store_error(event: &str, err: StoreError) -> Result<(), SidebarError> {
    match err {
        StoreError::ContextInvalidated => Err(SidebarError::ContextInvalidated),
        other => {
            error!("event={event} module=sidebar status=error error={other}");
            Ok(())
        }
    }
}
