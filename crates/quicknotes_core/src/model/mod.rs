//! Domain model for saved notes.
//!
//! # Responsibility
//! - Define the canonical note record shared by every surface.
//! - Own note identity generation and collection naming.
//!
//! # Invariants
//! - A `NoteId` is unique across the union of both collections.
//! - Collections are ordered newest-first; new and restored notes are
//!   prepended, never appended.

pub mod note;
