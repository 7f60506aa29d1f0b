//! Page surface: sidebar visibility and selection capture wiring.
//!
//! # Responsibility
//! - Track whether the sidebar is shown on this page.
//! - Drive the capture state machine and forward save requests through the
//!   router.
//!
//! # Invariants
//! - `RequestSave` effects never leak to the host; the surface consumes
//!   them and forwards the text as a `SAVE_HIGHLIGHT` message.
//! - The affordance hides only after an acknowledged save.

use crate::capture::{CaptureEffect, CaptureEvent, PointerPoint, SelectionCapture};
use crate::message::router::{ChannelDirective, MessageEndpoint, MessageRouter, Responder};
use crate::message::{Message, SaveAck, SurfaceId};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Page-embedded surface hosting the sidebar frame and the affordance.
#[derive(Default)]
pub struct PageSurface {
    sidebar_visible: AtomicBool,
    capture: Mutex<SelectionCapture>,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible.load(Ordering::SeqCst)
    }

    /// Pointer released after a selection drag.
    ///
    /// Returns the effects the host must apply (show/hide the affordance).
    pub fn pointer_released(
        &self,
        router: &MessageRouter,
        text: &str,
        at: PointerPoint,
        within_sidebar: bool,
    ) -> Vec<CaptureEffect> {
        let effects = {
            let mut capture = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
            capture.handle(CaptureEvent::SelectionReleased {
                text: text.to_string(),
                at,
                within_sidebar,
            })
        };
        self.drive(router, effects)
    }

    /// Pointer pressed anywhere on the page.
    pub fn pointer_pressed(
        &self,
        router: &MessageRouter,
        inside_affordance: bool,
    ) -> Vec<CaptureEffect> {
        let effects = {
            let mut capture = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
            capture.handle(CaptureEvent::PointerPressed { inside_affordance })
        };
        self.drive(router, effects)
    }

    /// Consumes `RequestSave` effects by routing them to the background;
    /// passes every other effect through to the host.
    fn drive(&self, router: &MessageRouter, effects: Vec<CaptureEffect>) -> Vec<CaptureEffect> {
        let mut host_effects = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                CaptureEffect::RequestSave { text } => {
                    match router.send(SurfaceId::Background, Message::SaveHighlight { text }) {
                        Ok(Some(SaveAck::Success)) => {
                            let acknowledged = {
                                let mut capture =
                                    self.capture.lock().unwrap_or_else(PoisonError::into_inner);
                                capture.handle(CaptureEvent::SaveAcknowledged)
                            };
                            host_effects.extend(acknowledged);
                        }
                        Ok(None) => {
                            warn!("event=save_request module=page status=unacknowledged");
                        }
                        Err(err) => {
                            warn!("event=save_request module=page status=error error={err}");
                        }
                    }
                }
                other => host_effects.push(other),
            }
        }
        host_effects
    }
}

impl MessageEndpoint for PageSurface {
    fn on_message(
        &self,
        _router: &MessageRouter,
        message: &Message,
        _responder: Responder,
    ) -> ChannelDirective {
        match message {
            Message::ToggleSidebar => {
                let shown = self.sidebar_visible.load(Ordering::SeqCst);
                self.sidebar_visible.store(!shown, Ordering::SeqCst);
                ChannelDirective::Close
            }
            Message::CloseSidebar => {
                self.sidebar_visible.store(false, Ordering::SeqCst);
                ChannelDirective::Close
            }
            Message::SaveHighlight { .. } => {
                debug!("event=message_ignored module=page kind=SAVE_HIGHLIGHT");
                ChannelDirective::Close
            }
        }
    }
}
