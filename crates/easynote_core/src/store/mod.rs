//! Note store: durable CRUD over the key-value boundary.
//!
//! # Responsibility
//! - Own the in-memory note list and its persistence protocol.
//! - Surface recoverable storage faults without ever blocking callers.
//!
//! # Invariants
//! - Every mutation rewrites the whole document under one namespaced key.
//! - Persistence failures never roll back in-memory state.

mod note_store;

pub use note_store::{FaultKind, NoteStore, StoreError, StoreFault, StoreResult, NOTES_KEY};
