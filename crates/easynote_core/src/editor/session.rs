//! Editing-session working copy and its synchronization rules.
//!
//! # Responsibility
//! - Hold the working copy of one editing session: title, run document,
//!   current style, history flags.
//! - Keep the plain-text and serialized projections consistent after every
//!   input notification.
//!
//! # Invariants
//! - One session at a time; `end_session` resets working state.
//! - Style toggles affect subsequently typed text only, never earlier runs.
//! - The engine handle survives session resets.

use super::engine::{Alignment, ContentUpdate, EditorEngine, EngineCommand};
use crate::model::content::{FormatAttribute, FormatSet, RichDocument};
use crate::model::note::{Note, NoteId};
use log::warn;

/// Default editor font size in logical points.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Final working values handed back to the caller when a session ends.
///
/// The bridge touches no persistence; the caller decides whether to hand
/// these to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// `Some` when the session edited an existing note.
    pub note_id: Option<NoteId>,
    pub title: String,
    pub plain_text: String,
    /// Serialized run document; `None` when the session held no text.
    pub state: Option<String>,
}

/// Working state of the active editing session.
pub struct EditorSession {
    note_id: Option<NoteId>,
    title: String,
    document: RichDocument,
    active: FormatSet,
    font_size: f32,
    can_undo: bool,
    can_redo: bool,
    engine: Option<Box<dyn EditorEngine>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            note_id: None,
            title: String::new(),
            document: RichDocument::empty(),
            active: FormatSet::plain(),
            font_size: DEFAULT_FONT_SIZE,
            can_undo: false,
            can_redo: false,
            engine: None,
        }
    }

    /// Starts a session, optionally seeded from an existing note.
    ///
    /// A valid serialized state wins for run structure; an invalid one is
    /// logged and the note's plain content is used instead. Both absent
    /// yields an empty new-note session.
    pub fn begin_session(&mut self, existing: Option<&Note>, serialized_state: Option<&str>) {
        self.reset();
        if let Some(note) = existing {
            self.note_id = Some(note.id);
            self.title = note.title.clone();
            self.document = RichDocument::from_plain_text(note.content.as_str());
        }
        if let Some(raw) = serialized_state {
            match RichDocument::parse(raw) {
                Ok(document) => self.document = document,
                Err(err) => {
                    warn!("event=session_seed module=editor status=fallback error={err}");
                }
            }
        }
    }

    /// Applies a plain-surface text change.
    ///
    /// An appended suffix becomes a run carrying the active format set,
    /// merged into the trailing run when marks match. A shortened prefix
    /// trims runs from the end. Any other edit collapses the document to
    /// one unmarked run; run attribution for mid-string edits is not
    /// modeled.
    pub fn on_text_changed(&mut self, new_text: &str) {
        let current = self.document.plain_text();
        if new_text == current {
            return;
        }
        if let Some(appended) = new_text.strip_prefix(current.as_str()) {
            self.document.push_text(appended, self.active);
        } else if current.starts_with(new_text) {
            self.document.truncate_plain(new_text.len());
        } else {
            self.document = RichDocument::from_plain_text(new_text);
        }
    }

    /// Flips one style flag for subsequently typed text and forwards the
    /// command to the attached engine.
    ///
    /// Text already in the document keeps its marks.
    pub fn toggle_format(&mut self, attribute: FormatAttribute) {
        self.active.toggle(attribute);
        self.dispatch(EngineCommand::Format(attribute));
    }

    /// Forwards a block-alignment command.
    ///
    /// Alignment is engine state and is not mirrored in the session.
    pub fn align(&mut self, alignment: Alignment) {
        self.dispatch(EngineCommand::Align(alignment));
    }

    pub fn on_title_changed(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Session-scoped scalar; never forwarded, never persisted.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Current style applied to subsequently typed text.
    pub fn active_formatting(&self) -> FormatSet {
        self.active
    }

    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.can_redo
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    /// Plain-text projection of the working document.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Serialized working state.
    ///
    /// `None` when the document is empty or fails to serialize; the
    /// failure is logged, never surfaced as a panic.
    pub fn working_state(&self) -> Option<String> {
        if self.document.is_empty() {
            return None;
        }
        match self.document.to_json() {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!("event=session_state module=editor status=error error={err}");
                None
            }
        }
    }

    /// Ends the session and returns the final working values.
    ///
    /// Working state resets for the next session; the engine stays
    /// attached.
    pub fn end_session(&mut self) -> SessionSnapshot {
        let snapshot = SessionSnapshot {
            note_id: self.note_id,
            title: self.title.clone(),
            plain_text: self.document.plain_text(),
            state: self.working_state(),
        };
        self.reset();
        snapshot
    }

    /// Attaches (or replaces) the engine commands are forwarded to.
    pub fn attach_engine(&mut self, engine: Box<dyn EditorEngine>) {
        self.engine = Some(engine);
    }

    /// Adopts a content notification from the engine.
    ///
    /// A valid state replaces the working document; a corrupt one is
    /// logged and the carried plain text is adopted instead. When both
    /// parse and the projections disagree, the parsed document wins.
    pub fn on_engine_content(&mut self, update: &ContentUpdate) {
        match RichDocument::parse(&update.state) {
            Ok(document) => {
                if document.plain_text() != update.plain_text {
                    warn!("event=engine_content module=editor status=mismatch");
                }
                self.document = document;
            }
            Err(err) => {
                warn!("event=engine_content module=editor status=fallback error={err}");
                self.document = RichDocument::from_plain_text(update.plain_text.as_str());
            }
        }
    }

    /// Mirrors the engine's reported selection style.
    pub fn on_selection_change(&mut self, active: FormatSet) {
        self.active = active;
    }

    /// Mirrors the engine's reported history availability.
    pub fn on_history_state(&mut self, can_undo: bool, can_redo: bool) {
        self.can_undo = can_undo;
        self.can_redo = can_redo;
    }

    /// Forwards an undo command; the bridge owns no history.
    pub fn undo(&mut self) {
        self.dispatch(EngineCommand::Undo);
    }

    /// Forwards a redo command; the bridge owns no history.
    pub fn redo(&mut self) {
        self.dispatch(EngineCommand::Redo);
    }

    fn dispatch(&mut self, command: EngineCommand) {
        if let Some(engine) = self.engine.as_mut() {
            engine.dispatch(command);
        }
    }

    fn reset(&mut self) {
        self.note_id = None;
        self.title.clear();
        self.document = RichDocument::empty();
        self.active = FormatSet::plain();
        self.font_size = DEFAULT_FONT_SIZE;
        self.can_undo = false;
        self.can_redo = false;
    }
}
