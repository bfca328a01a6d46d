//! Rich-content document schema.
//!
//! # Responsibility
//! - Define the serialized editor state: a versioned sequence of text runs.
//! - Convert between the run document and its plain-text projection.
//!
//! # Invariants
//! - `version` is checked on parse; unknown versions are a typed error.
//! - Normalized documents hold no empty runs and no adjacent runs with equal
//!   marks.
//! - `plain_text()` is the exact concatenation of run text.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rich-content schema version written by this crate.
pub const RICH_CONTENT_VERSION: u32 = 1;

pub type ContentResult<T> = Result<T, ContentError>;

/// Parse/serialize error for rich-content documents.
#[derive(Debug)]
pub enum ContentError {
    /// Blob is not valid JSON for the run schema.
    Malformed(serde_json::Error),
    /// Document could not be serialized.
    Encode(serde_json::Error),
    /// Document was written by a schema this crate does not understand.
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed rich content: {err}"),
            Self::Encode(err) => write!(f, "failed to serialize rich content: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "rich content version {found} is not supported (latest supported {supported})"
            ),
        }
    }
}

impl Error for ContentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

/// One of the four inline formatting flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatAttribute {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// Inline formatting flags carried by a run.
///
/// Absent flags deserialize as `false`, so older documents stay readable
/// when new flags appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl FormatSet {
    /// Returns the set with no flags raised.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Returns whether no flag is raised.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Flips one flag in place.
    pub fn toggle(&mut self, attribute: FormatAttribute) {
        match attribute {
            FormatAttribute::Bold => self.bold = !self.bold,
            FormatAttribute::Italic => self.italic = !self.italic,
            FormatAttribute::Underline => self.underline = !self.underline,
            FormatAttribute::Strikethrough => self.strikethrough = !self.strikethrough,
        }
    }

    /// Returns whether one flag is raised.
    pub fn is_set(&self, attribute: FormatAttribute) -> bool {
        match attribute {
            FormatAttribute::Bold => self.bold,
            FormatAttribute::Italic => self.italic,
            FormatAttribute::Underline => self.underline,
            FormatAttribute::Strikethrough => self.strikethrough,
        }
    }
}

/// One contiguous stretch of text sharing a single format set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub marks: FormatSet,
}

/// Versioned serialized editor state.
///
/// The document is an ordered run sequence; concatenating run text yields
/// the plain-text projection stored on the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichDocument {
    pub version: u32,
    pub runs: Vec<TextRun>,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl RichDocument {
    /// Returns a document with no runs at the current schema version.
    pub fn empty() -> Self {
        Self {
            version: RICH_CONTENT_VERSION,
            runs: Vec::new(),
        }
    }

    /// Wraps plain text into a single unmarked run.
    ///
    /// Empty text yields an empty document, not an empty run.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut document = Self::empty();
        if !text.is_empty() {
            document.runs.push(TextRun {
                text,
                marks: FormatSet::plain(),
            });
        }
        document
    }

    /// Concatenated run text with formatting stripped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Returns whether the document holds no text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Appends text carrying `marks`, merging into the trailing run when its
    /// marks match.
    pub fn push_text(&mut self, text: &str, marks: FormatSet) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.marks == marks {
                last.text.push_str(text);
                return;
            }
        }
        self.runs.push(TextRun {
            text: text.to_string(),
            marks,
        });
    }

    /// Shortens the document to the first `len` bytes of its projection,
    /// trimming runs from the end.
    ///
    /// `len` must lie on a char boundary of the projection; callers obtain
    /// it from a prefix of `plain_text()`.
    pub fn truncate_plain(&mut self, len: usize) {
        let mut remaining = len;
        let mut keep = 0;
        for run in &self.runs {
            if remaining == 0 {
                break;
            }
            if run.text.len() <= remaining {
                remaining -= run.text.len();
                keep += 1;
            } else {
                break;
            }
        }
        if remaining > 0 {
            if let Some(run) = self.runs.get_mut(keep) {
                run.text.truncate(remaining);
                keep += 1;
            }
        }
        self.runs.truncate(keep);
    }

    /// Parses and validates a serialized document.
    ///
    /// The parsed document is normalized: empty runs are dropped and
    /// adjacent runs with equal marks merge.
    ///
    /// # Errors
    /// - `ContentError::Malformed` when the blob is not run-schema JSON.
    /// - `ContentError::UnsupportedVersion` when `version` is unknown.
    pub fn parse(raw: &str) -> ContentResult<Self> {
        let parsed: Self = serde_json::from_str(raw).map_err(ContentError::Malformed)?;
        if parsed.version != RICH_CONTENT_VERSION {
            return Err(ContentError::UnsupportedVersion {
                found: parsed.version,
                supported: RICH_CONTENT_VERSION,
            });
        }
        let mut document = Self::empty();
        for run in parsed.runs {
            document.push_text(&run.text, run.marks);
        }
        Ok(document)
    }

    /// Serializes the document to its JSON wire form.
    ///
    /// # Errors
    /// - `ContentError::Encode` when serialization fails.
    pub fn to_json(&self) -> ContentResult<String> {
        serde_json::to_string(self).map_err(ContentError::Encode)
    }
}
