//! Whole-document note persistence over a key-value backend.
//!
//! # Responsibility
//! - Provide the create/update/delete/list facade over the note list.
//! - Apply the load-time recovery policy: corrupt storage degrades to an
//!   empty list instead of an error.
//!
//! # Invariants
//! - After every successful mutation the serialized document under
//!   `NOTES_KEY` equals the in-memory list.
//! - `load()` never returns an error; failures are surfaced through
//!   `last_fault()`.
//! - Mutations take `&mut self`, so overlapping writes cannot be expressed;
//!   the last completed write's full snapshot wins.

use crate::kv::{KeyValueStore, KvError};
use crate::model::note::{Note, NoteId};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Single namespaced key holding the serialized note document.
pub const NOTES_KEY: &str = "easynote.notes";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for note persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backend read failed.
    Read(KvError),
    /// Stored document is not valid note JSON.
    Parse(serde_json::Error),
    /// In-memory list could not be serialized.
    Encode(serde_json::Error),
    /// Backend write failed.
    Write(KvError),
    /// Target note does not exist.
    NotFound(NoteId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read note document: {err}"),
            Self::Parse(err) => write!(f, "stored note document is corrupt: {err}"),
            Self::Encode(err) => write!(f, "failed to serialize note document: {err}"),
            Self::Write(err) => write!(f, "failed to persist note document: {err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Write(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

/// Which half of the persistence protocol a fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The startup read failed; the list fell back to empty.
    Load,
    /// A write-through flush failed; memory is ahead of storage.
    Save,
}

/// Cloneable record of the most recent recoverable storage failure.
///
/// Faults carry rendered messages only, never note payloads, so shells can
/// show or log them freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFault {
    pub kind: FaultKind,
    pub message: String,
}

/// Note store over an owned key-value backend.
///
/// The store is the single writer of the note document. Shells that share
/// it across tasks wrap it in a mutex, which is exactly the call-site
/// serialization the whole-document protocol requires.
pub struct NoteStore {
    backend: Box<dyn KeyValueStore>,
    notes: Vec<Note>,
    loading: bool,
    last_fault: Option<StoreFault>,
}

impl NoteStore {
    /// Creates a store over `backend`; call `load()` before first use.
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            notes: Vec::new(),
            loading: true,
            last_fault: None,
        }
    }

    /// Reads the persisted document once at startup.
    ///
    /// Missing data yields an empty list. Read and parse failures also
    /// yield an empty list: the caller is never blocked by corrupt storage.
    /// The failure is logged and recorded as a `Load` fault instead.
    /// `loading` becomes `false` regardless of outcome.
    ///
    /// # Side effects
    /// - Emits `notes_load` events with count and duration.
    pub async fn load(&mut self) {
        let started_at = Instant::now();
        match self.read_document().await {
            Ok(notes) => {
                info!(
                    "event=notes_load module=store status=ok count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                self.notes = notes;
                self.last_fault = None;
            }
            Err(err) => {
                error!(
                    "event=notes_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.notes = Vec::new();
                self.last_fault = Some(StoreFault {
                    kind: FaultKind::Load,
                    message: err.to_string(),
                });
            }
        }
        self.loading = false;
    }

    /// Creates a note and persists the grown list.
    ///
    /// The title placeholder rule is applied; `created_at == updated_at` on
    /// the returned note.
    ///
    /// # Errors
    /// - `Encode`/`Write` when the flush fails; the note stays in memory
    ///   and a `Save` fault is recorded (see `flush()`).
    pub async fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let started_at = Instant::now();
        let note = Note::new(title, content);
        self.notes.push(note.clone());

        match self.persist().await {
            Ok(()) => {
                info!(
                    "event=note_create module=store status=ok id={} count={} duration_ms={}",
                    note.id,
                    self.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(note)
            }
            Err(err) => {
                error!(
                    "event=note_create module=store status=error id={} duration_ms={} error={}",
                    note.id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces title and content of an existing note and persists.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is refreshed. The
    /// title placeholder rule is applied.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent; nothing is persisted.
    /// - `Encode`/`Write` when the flush fails; the edit stays in memory.
    pub async fn update(
        &mut self,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let started_at = Instant::now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return Err(StoreError::NotFound(id));
        };
        note.apply_edit(title, content);
        let updated = note.clone();

        match self.persist().await {
            Ok(()) => {
                info!(
                    "event=note_update module=store status=ok id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(updated)
            }
            Err(err) => {
                error!(
                    "event=note_update module=store status=error id={id} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Removes a note when present and persists the shrunk list.
    ///
    /// A missing id is a no-op that also skips the flush; there is no state
    /// change worth persisting.
    pub async fn delete(&mut self, id: NoteId) -> StoreResult<()> {
        let started_at = Instant::now();
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return Ok(());
        }

        match self.persist().await {
            Ok(()) => {
                info!(
                    "event=note_delete module=store status=ok id={id} count={} duration_ms={}",
                    self.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=note_delete module=store status=error id={id} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns notes matching a case-insensitive substring filter over
    /// title or content.
    ///
    /// `None` or an empty filter returns every note in store order.
    pub fn list(&self, filter: Option<&str>) -> Vec<Note> {
        match filter {
            Some(needle) if !needle.is_empty() => self
                .notes
                .iter()
                .filter(|note| note.matches_filter(needle))
                .cloned()
                .collect(),
            _ => self.notes.clone(),
        }
    }

    /// Re-persists the current snapshot.
    ///
    /// The retry affordance after a surfaced write fault; also usable as a
    /// shutdown barrier.
    pub async fn flush(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.persist().await {
            Ok(()) => {
                info!(
                    "event=notes_persist module=store status=ok count={} duration_ms={}",
                    self.notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notes_persist module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// All notes in creation order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Looks up one note by id.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// `true` until the first `load()` completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The most recent unacknowledged storage fault, if any.
    pub fn last_fault(&self) -> Option<&StoreFault> {
        self.last_fault.as_ref()
    }

    /// Clears and returns the recorded fault, acknowledging it.
    pub fn take_fault(&mut self) -> Option<StoreFault> {
        self.last_fault.take()
    }

    async fn read_document(&self) -> StoreResult<Vec<Note>> {
        let raw = self.backend.get(NOTES_KEY).await.map_err(StoreError::Read)?;
        match raw {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::Parse),
            None => Ok(Vec::new()),
        }
    }

    /// Serializes the current list and writes it through the backend.
    ///
    /// Success clears any recorded fault. Failure records a `Save` fault
    /// and leaves the in-memory list untouched, so a later `flush()` can
    /// complete the commit.
    async fn persist(&mut self) -> StoreResult<()> {
        let encoded = match serde_json::to_vec(&self.notes) {
            Ok(bytes) => bytes,
            Err(err) => return Err(self.record_save_fault(StoreError::Encode(err))),
        };
        match self.backend.set(NOTES_KEY, encoded).await {
            Ok(()) => {
                self.last_fault = None;
                Ok(())
            }
            Err(err) => Err(self.record_save_fault(StoreError::Write(err))),
        }
    }

    fn record_save_fault(&mut self, err: StoreError) -> StoreError {
        self.last_fault = Some(StoreFault {
            kind: FaultKind::Save,
            message: err.to_string(),
        });
        err
    }
}
