//! Core domain logic for Easy Note.
//! This crate is the single source of truth for business invariants.

pub mod editor;
pub mod kv;
pub mod logging;
pub mod model;
pub mod store;

pub use editor::engine::{Alignment, ContentUpdate, EditorEngine, EngineCommand};
pub use editor::session::{EditorSession, SessionSnapshot, DEFAULT_FONT_SIZE};
pub use kv::{FileKv, KeyValueStore, KvError, KvResult, MemoryKv, SqliteKv};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::content::{
    ContentError, ContentResult, FormatAttribute, FormatSet, RichDocument, TextRun,
    RICH_CONTENT_VERSION,
};
pub use model::note::{normalize_title, Note, NoteId, PLACEHOLDER_TITLE};
pub use store::{FaultKind, NoteStore, StoreError, StoreFault, StoreResult, NOTES_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
