//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its stable identity.
//! - Keep wire field naming compatible with the persisted state layout.
//!
//! # Invariants
//! - `id` is time-derived with a random component, so repeated creation
//!   within one clock tick still yields distinct ids.
//! - `created_at` serializes as an ISO-8601 string (`createdAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one saved note.
///
/// Stored and transported as an opaque string; the constructor derives it
/// from the creation instant plus a random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh id for a note created at `instant`.
    ///
    /// Wall-clock alone is not collision-safe under rapid repeated saves,
    /// so the id carries the first `uuid` segment as a random suffix.
    pub fn generate(instant: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "note_{}_{}",
            instant.timestamp_millis(),
            &suffix[..8]
        ))
    }

    /// Wraps an already-persisted id without re-deriving it.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One saved rich-text snippet.
///
/// `content` is opaque HTML produced by the editing widget or by selection
/// capture; the core never interprets it beyond plain-text rendering for
/// search and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note stamped with the current instant.
    pub fn new(content: impl Into<String>) -> Self {
        Self::created_at(content, Utc::now())
    }

    /// Creates a note with an explicit creation instant.
    ///
    /// Used by deterministic tests and by import paths where the instant is
    /// already known.
    pub fn created_at(content: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::generate(instant),
            content: content.into(),
            created_at: instant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteId};
    use chrono::Utc;

    #[test]
    fn generated_ids_are_distinct_within_one_instant() {
        let instant = Utc::now();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            assert!(seen.insert(NoteId::generate(instant)));
        }
    }

    #[test]
    fn id_carries_creation_millis() {
        let instant = Utc::now();
        let id = NoteId::generate(instant);
        assert!(id
            .as_str()
            .starts_with(&format!("note_{}_", instant.timestamp_millis())));
    }

    #[test]
    fn note_serializes_with_wire_field_names() {
        let note = Note::new("<p>hello</p>");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"].as_str(), Some(note.id.as_str()));
        assert_eq!(json["content"].as_str(), Some("<p>hello</p>"));
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn note_roundtrips_through_json() {
        let note = Note::new("<p>roundtrip</p>");
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }
}
