use chrono::NaiveDate;
use quicknotes_core::{
    ClipboardSink, ClipboardUnavailable, NoteAction, NoteId, NoteLifecycle, NoteStore,
    RuntimeContext, SidebarError, SidebarView, Tab, EXPORT_MIME,
};
use std::sync::{Arc, Mutex};

struct Fixture {
    store: Arc<NoteStore>,
    context: RuntimeContext,
    view: Arc<SidebarView>,
}

fn fixture() -> Fixture {
    let context = RuntimeContext::new();
    let store = Arc::new(NoteStore::open_in_memory(context.clone()).unwrap());
    let view = Arc::new(SidebarView::new(NoteLifecycle::new(store.clone())));
    store.subscribe(view.clone());
    view.load().unwrap();
    Fixture {
        store,
        context,
        view,
    }
}

struct FakeClipboard {
    fail: bool,
    wrote: Mutex<Option<String>>,
}

impl FakeClipboard {
    fn working() -> Self {
        Self {
            fail: false,
            wrote: Mutex::new(None),
        }
    }

    fn broken() -> Self {
        Self {
            fail: true,
            wrote: Mutex::new(None),
        }
    }
}

impl ClipboardSink for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardUnavailable> {
        if self.fail {
            return Err(ClipboardUnavailable);
        }
        *self.wrote.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[test]
fn mirrors_refresh_on_external_store_change() {
    let fx = fixture();
    // A different surface writes through its own lifecycle handle.
    let background = NoteLifecycle::new(fx.store.clone());
    background.create_note("<p>from background</p>").unwrap();

    let render = fx.view.render();
    assert_eq!(render.tab, Tab::Notes);
    assert_eq!(render.cards.len(), 1);
    assert_eq!(render.cards[0].plain_text, "from background");
}

#[test]
fn search_filters_case_insensitively_over_plain_text() {
    let fx = fixture();
    fx.view
        .save_note("<p>Meeting <strong>Notes</strong></p>")
        .unwrap();
    fx.view.save_note("<p>Grocery list</p>").unwrap();

    fx.view.set_search("meeting notes");
    let render = fx.view.render();
    assert_eq!(render.cards.len(), 1);
    assert_eq!(render.cards[0].plain_text, "Meeting Notes");

    fx.view.set_search("strong");
    let render = fx.view.render();
    assert!(render.cards.is_empty());
    assert_eq!(render.empty_message.as_deref(), Some("No notes found."));
}

#[test]
fn tabs_render_their_collection_with_matching_actions() {
    let fx = fixture();
    let note = fx.view.save_note("<p>binned soon</p>").unwrap().unwrap();
    fx.view.move_to_trash(&note.id).unwrap();

    let render = fx.view.render();
    assert!(render.cards.is_empty());

    fx.view.set_active_tab(Tab::Trash);
    let render = fx.view.render();
    assert_eq!(render.tab, Tab::Trash);
    assert_eq!(render.cards.len(), 1);
    assert_eq!(
        render.cards[0].actions,
        &[NoteAction::Restore, NoteAction::DeletePermanently]
    );

    fx.view.restore_from_trash(&note.id).unwrap();
    fx.view.set_active_tab(Tab::Notes);
    let render = fx.view.render();
    assert_eq!(
        render.cards[0].actions,
        &[
            NoteAction::CopyText,
            NoteAction::ExportText,
            NoteAction::MoveToTrash
        ]
    );
}

#[test]
fn blank_editor_content_is_never_saved() {
    let fx = fixture();
    assert!(fx.view.save_note("   ").unwrap().is_none());
    assert!(fx.view.save_note("<p><br></p>").unwrap().is_none());
    assert!(fx.view.render().cards.is_empty());
}

#[test]
fn export_builds_dated_plain_text_file() {
    let fx = fixture();
    let note = fx
        .view
        .save_note("<p>Export <em>me</em> please</p>")
        .unwrap()
        .unwrap();

    let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let file = fx.view.export_note(&note.id, day).unwrap();
    assert_eq!(file.filename, "note_2026-08-07.txt");
    assert_eq!(file.mime, EXPORT_MIME);
    assert_eq!(file.body, "Export me please");
}

#[test]
fn copy_writes_plain_text_through_the_sink() {
    let fx = fixture();
    let note = fx.view.save_note("<p>Copy <b>this</b></p>").unwrap().unwrap();

    let clipboard = FakeClipboard::working();
    let copied = fx.view.copy_note_text(&note.id, &clipboard).unwrap();
    assert_eq!(copied.as_deref(), Some("Copy this"));
    assert_eq!(clipboard.wrote.lock().unwrap().as_deref(), Some("Copy this"));
}

#[test]
fn clipboard_failure_surfaces_a_blocking_notice() {
    let fx = fixture();
    let note = fx.view.save_note("<p>unreachable</p>").unwrap().unwrap();

    let err = fx
        .view
        .copy_note_text(&note.id, &FakeClipboard::broken())
        .unwrap_err();
    assert_eq!(err, SidebarError::ClipboardUnavailable);
    assert!(err.user_notice().contains("copy"));
}

#[test]
fn unknown_ids_yield_no_copy_or_export() {
    let fx = fixture();
    let ghost = NoteId::from_raw("note_0_deadbeef");
    assert!(fx
        .view
        .copy_note_text(&ghost, &FakeClipboard::working())
        .unwrap()
        .is_none());
    let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    assert!(fx.view.export_note(&ghost, day).is_none());
}

#[test]
fn invalidated_context_surfaces_reload_notice() {
    let fx = fixture();
    let note = fx.view.save_note("<p>pre-teardown</p>").unwrap().unwrap();

    fx.context.invalidate();

    let err = fx.view.save_note("<p>too late</p>").unwrap_err();
    assert_eq!(err, SidebarError::ContextInvalidated);
    assert!(err.user_notice().contains("Refresh"));

    assert_eq!(
        fx.view.move_to_trash(&note.id).unwrap_err(),
        SidebarError::ContextInvalidated
    );
}
