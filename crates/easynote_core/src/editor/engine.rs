//! External rich-editor engine contract.

use crate::model::content::FormatAttribute;

/// Block alignment understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Commands the bridge dispatches to an attached engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    /// Toggle one inline format at the current selection.
    Format(FormatAttribute),
    /// Align the current block.
    Align(Alignment),
    Undo,
    Redo,
}

/// Content notification reported by the engine after an edit.
#[derive(Debug, Clone)]
pub struct ContentUpdate {
    /// Serialized run document for storage and re-hydration.
    pub state: String,
    /// Plain-text projection reported alongside the state.
    pub plain_text: String,
}

/// Dispatch half of the engine boundary.
///
/// Implementations live in the embedding shell's editor component; tests
/// use a recording fake. Dispatch is fire-and-forget; the engine reports
/// resulting state through the `on_*` notifications on the session.
pub trait EditorEngine: Send {
    fn dispatch(&mut self, command: EngineCommand);
}
