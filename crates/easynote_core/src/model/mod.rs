//! Domain model shared by the note store and the editor bridge.
//!
//! # Responsibility
//! - Define the canonical persisted note record.
//! - Define the versioned rich-content run schema behind serialized editor
//!   state.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Rich content carries a schema version; unknown versions are rejected on
//!   parse instead of being guessed at.

pub mod content;
pub mod note;
