//! Editor bridge between the UI text surface and the external rich engine.
//!
//! # Responsibility
//! - Track the working copy of the active editing session.
//! - Define the command contract toward the embedding editor engine.
//!
//! # Invariants
//! - The bridge never touches persistence; a session ends with a snapshot
//!   the caller hands to the store.
//! - The engine owns command execution, selection and history; the bridge
//!   forwards commands and mirrors reported state.

pub mod engine;
pub mod session;
