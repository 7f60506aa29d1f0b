//! Selection capture state machine for the host page.
//!
//! # Responsibility
//! - Track the transient save affordance shown over a text selection.
//! - Turn pointer events into effects the host applies (show, hide,
//!   request-save).
//!
//! # Invariants
//! - Selections inside the sidebar surface never trigger the affordance.
//! - The affordance survives until an outside press, an empty selection, or
//!   an acknowledged save.
//! - The machine is pure: no I/O, effects are returned to the caller.

/// Pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPoint {
    pub x: i32,
    pub y: i32,
}

/// Vertical offset lifting the affordance above the release point.
const AFFORDANCE_OFFSET_Y: i32 = 40;

/// Capture states; the drag itself (`Selecting`) is implicit in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    AffordanceShown,
}

/// Host events fed into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Pointer released after a drag; `text` is the raw selection.
    SelectionReleased {
        text: String,
        at: PointerPoint,
        within_sidebar: bool,
    },
    /// Any pointer press on the page.
    PointerPressed { inside_affordance: bool },
    /// The routed save request was acknowledged.
    SaveAcknowledged,
}

/// Effects for the host to apply, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEffect {
    ShowAffordance { at: PointerPoint },
    HideAffordance,
    /// Forward the captured text as a create-note request.
    RequestSave { text: String },
}

/// Affordance state machine over one host page.
#[derive(Debug, Default)]
pub struct SelectionCapture {
    state: CaptureState,
    pending_text: Option<String>,
}

impl SelectionCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Advances the machine and returns the effects to apply.
    pub fn handle(&mut self, event: CaptureEvent) -> Vec<CaptureEffect> {
        match event {
            CaptureEvent::SelectionReleased {
                text,
                at,
                within_sidebar,
            } => self.on_selection_released(text, at, within_sidebar),
            CaptureEvent::PointerPressed { inside_affordance } => {
                self.on_pointer_pressed(inside_affordance)
            }
            CaptureEvent::SaveAcknowledged => self.dismiss(),
        }
    }

    fn on_selection_released(
        &mut self,
        text: String,
        at: PointerPoint,
        within_sidebar: bool,
    ) -> Vec<CaptureEffect> {
        if within_sidebar {
            return Vec::new();
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.dismiss();
        }

        self.state = CaptureState::AffordanceShown;
        self.pending_text = Some(trimmed.to_string());
        vec![CaptureEffect::ShowAffordance {
            at: PointerPoint {
                x: at.x,
                y: at.y - AFFORDANCE_OFFSET_Y,
            },
        }]
    }

    fn on_pointer_pressed(&mut self, inside_affordance: bool) -> Vec<CaptureEffect> {
        if self.state != CaptureState::AffordanceShown {
            return Vec::new();
        }

        if !inside_affordance {
            return self.dismiss();
        }

        match &self.pending_text {
            Some(text) => vec![CaptureEffect::RequestSave { text: text.clone() }],
            None => Vec::new(),
        }
    }

    fn dismiss(&mut self) -> Vec<CaptureEffect> {
        let was_shown = self.state == CaptureState::AffordanceShown;
        self.state = CaptureState::Idle;
        self.pending_text = None;
        if was_shown {
            vec![CaptureEffect::HideAffordance]
        } else {
            Vec::new()
        }
    }
}
