//! Plain-text rendering and substring filtering.
//!
//! # Responsibility
//! - Strip rich-text markup down to searchable plain text.
//! - Filter collections by case-insensitive substring match.
//!
//! # Invariants
//! - A blank query matches every note.
//! - Matching always runs against the plain-text rendering, never the raw
//!   markup.

use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Renders opaque note HTML as plain text.
///
/// Tags are dropped, the handful of entities the editing widget emits are
/// decoded, and whitespace is collapsed.
pub fn plain_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Whether a note's plain-text rendering contains `query`,
/// case-insensitively. Blank queries match everything.
pub fn matches_query(note: &Note, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    plain_text(&note.content).to_lowercase().contains(&needle)
}

/// Filters a collection down to the notes matching `query`, preserving
/// order.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|note| matches_query(note, query))
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
