//! Typed messages exchanged between execution surfaces.
//!
//! # Responsibility
//! - Define the closed message set and its wire encoding.
//! - Name the surfaces messages can be addressed to.
//!
//! # Invariants
//! - The message set is closed: routing matches exhaustively, there is no
//!   unrecognized-type path.
//! - Wire encoding is a `type`-tagged JSON object in SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod router;

pub use router::{ChannelDirective, MessageEndpoint, MessageRouter, Responder, RouterError, RouterResult};

/// Cross-surface message set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// User icon action; toggles sidebar visibility on the page surface.
    ToggleSidebar,
    /// Sidebar close request; routed via the background, which re-targets
    /// the currently active page.
    CloseSidebar,
    /// Captured selection from the page surface; the background replies
    /// with a [`SaveAck`] once the note is persisted.
    SaveHighlight { text: String },
}

impl Message {
    /// Stable wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToggleSidebar => "TOGGLE_SIDEBAR",
            Self::CloseSidebar => "CLOSE_SIDEBAR",
            Self::SaveHighlight { .. } => "SAVE_HIGHLIGHT",
        }
    }
}

/// Acknowledgment for a handled [`Message::SaveHighlight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SaveAck {
    Success,
}

/// Addressable execution surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SurfaceId {
    Background,
    Page,
    Sidebar,
}

impl SurfaceId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Page => "page",
            Self::Sidebar => "sidebar",
        }
    }
}

impl Display for SurfaceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Message, SaveAck};

    #[test]
    fn messages_use_screaming_type_tags_on_the_wire() {
        let json = serde_json::to_value(Message::SaveHighlight {
            text: "picked".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"].as_str(), Some("SAVE_HIGHLIGHT"));
        assert_eq!(json["text"].as_str(), Some("picked"));

        let toggle = serde_json::to_value(Message::ToggleSidebar).unwrap();
        assert_eq!(toggle["type"].as_str(), Some("TOGGLE_SIDEBAR"));
    }

    #[test]
    fn messages_decode_from_wire_form() {
        let message: Message =
            serde_json::from_str(r#"{"type":"CLOSE_SIDEBAR"}"#).unwrap();
        assert_eq!(message, Message::CloseSidebar);
    }

    #[test]
    fn save_ack_encodes_status_field() {
        let json = serde_json::to_value(SaveAck::Success).unwrap();
        assert_eq!(json["status"].as_str(), Some("success"));
    }
}
