//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads and write-backs into lifecycle-level APIs.
//! - Keep surfaces decoupled from collection encoding details.

pub mod lifecycle;
