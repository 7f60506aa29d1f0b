//! Core domain logic for QuickNotes.
//! This crate is the single source of truth for note lifecycle invariants.

pub mod capture;
pub mod db;
pub mod logging;
pub mod message;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod surface;

pub use capture::{CaptureEffect, CaptureEvent, CaptureState, PointerPoint, SelectionCapture};
pub use logging::{default_log_level, init_logging, logging_status};
pub use message::{
    ChannelDirective, Message, MessageEndpoint, MessageRouter, Responder, RouterError,
    RouterResult, SaveAck, SurfaceId,
};
pub use model::note::{Note, NoteId};
pub use search::text::{filter_notes, matches_query, plain_text};
pub use service::lifecycle::NoteLifecycle;
pub use store::{
    Collection, Collections, NoteStore, ObserverId, RuntimeContext, StoreChange, StoreError,
    StoreObserver, StoreResult, StoreWrite,
};
pub use surface::background::{BackgroundSurface, CONTEXT_MENU_ID, CONTEXT_MENU_TITLE};
pub use surface::page::PageSurface;
pub use surface::sidebar::{
    ClipboardSink, ClipboardUnavailable, ExportFile, NoteAction, NoteCard, SidebarError,
    SidebarRender, SidebarView, Tab, EXPORT_MIME,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
