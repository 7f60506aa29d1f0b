//! Background surface: note persistence and message re-targeting.
//!
//! # Responsibility
//! - Own the lifecycle manager and persist captured highlights.
//! - Expose the context-menu entry shown over host text selections.
//! - Re-target sidebar close requests to the active page.
//!
//! # Invariants
//! - Captured text is wrapped in minimal rich-text markup before persisting.
//! - The context-menu entry is visible only while a selection exists.

use crate::message::router::{ChannelDirective, MessageEndpoint, MessageRouter, Responder};
use crate::message::{Message, SaveAck, SurfaceId};
use crate::model::note::Note;
use crate::service::lifecycle::NoteLifecycle;
use crate::store::StoreResult;
use log::{debug, error, warn};
use std::sync::atomic::{AtomicBool, Ordering};

/// Stable identifier of the context-menu entry.
pub const CONTEXT_MENU_ID: &str = "save-to-quick-notes";
/// User-visible title of the context-menu entry.
pub const CONTEXT_MENU_TITLE: &str = "Save to Quick Notes";

/// Wraps raw selection text as minimal rich-text markup.
pub fn wrap_as_markup(text: &str) -> String {
    format!("<p>{text}</p>")
}

/// Background surface owning note persistence.
pub struct BackgroundSurface {
    lifecycle: NoteLifecycle,
    menu_visible: AtomicBool,
}

impl BackgroundSurface {
    pub fn new(lifecycle: NoteLifecycle) -> Self {
        Self {
            lifecycle,
            menu_visible: AtomicBool::new(false),
        }
    }

    /// User clicked the extension icon: toggle the sidebar on the page.
    pub fn icon_clicked(&self, router: &MessageRouter) {
        if let Err(err) = router.send(SurfaceId::Page, Message::ToggleSidebar) {
            warn!("event=icon_click module=background status=error error={err}");
        }
    }

    /// Tracks host selection state; the menu entry shows only while a
    /// non-empty selection exists.
    pub fn selection_changed(&self, selection: &str) {
        self.menu_visible
            .store(!selection.trim().is_empty(), Ordering::SeqCst);
    }

    pub fn context_menu_visible(&self) -> bool {
        self.menu_visible.load(Ordering::SeqCst)
    }

    /// Context-menu activation: same create-note effect as the affordance.
    ///
    /// Returns `None` for blank selections.
    pub fn context_menu_activated(&self, selection: &str) -> StoreResult<Option<Note>> {
        let trimmed = selection.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        self.save_highlight(trimmed).map(Some)
    }

    fn save_highlight(&self, text: &str) -> StoreResult<Note> {
        self.lifecycle.create_note(wrap_as_markup(text))
    }
}

impl MessageEndpoint for BackgroundSurface {
    fn on_message(
        &self,
        router: &MessageRouter,
        message: &Message,
        responder: Responder,
    ) -> ChannelDirective {
        match message {
            Message::SaveHighlight { text } => {
                match self.save_highlight(text) {
                    Ok(_) => responder.send(SaveAck::Success),
                    // No ack on failure: the sender's affordance stays up
                    // and the user may retry manually.
                    Err(err) => {
                        error!("event=save_highlight module=background status=error error={err}")
                    }
                }
                ChannelDirective::KeepOpen
            }
            Message::CloseSidebar => {
                if let Err(err) = router.send(SurfaceId::Page, Message::CloseSidebar) {
                    warn!("event=close_sidebar module=background status=error error={err}");
                }
                ChannelDirective::Close
            }
            Message::ToggleSidebar => {
                debug!("event=message_ignored module=background kind=TOGGLE_SIDEBAR");
                ChannelDirective::Close
            }
        }
    }
}
