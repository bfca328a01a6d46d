//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical persisted note record.
//! - Provide title normalization, filter matching and preview projections.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - A persisted note never carries an empty title; the placeholder is
//!   applied at save time.
//! - `created_at` is set once; `updated_at` moves forward on every edit.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Title given to a note saved without one.
pub const PLACEHOLDER_TITLE: &str = "New Note";

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Canonical persisted note record.
///
/// `content` holds the plain-text projection of the body. When the editor
/// produced rich formatting, its run document is serialized separately and
/// re-hydrated through `model::content`; the note itself stays plain so
/// filtering and previews never depend on the rich schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable global ID used for update/delete targeting.
    pub id: NoteId,
    /// Display title. Never empty once persisted.
    pub title: String,
    /// Plain-text body used for filtering and previews.
    pub content: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with a generated stable ID.
    ///
    /// # Invariants
    /// - `created_at == updated_at` on the fresh note.
    /// - An empty title is replaced by `PLACEHOLDER_TITLE`.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: normalize_title(title.into()),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content, refreshing `updated_at` only.
    ///
    /// `id` and `created_at` are preserved; the title placeholder rule is
    /// applied the same way as at creation.
    pub fn apply_edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = normalize_title(title.into());
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Returns whether the note matches a case-insensitive substring filter
    /// over title or content.
    pub fn matches_filter(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }

    /// Derives a single-line list preview from the content.
    ///
    /// Whitespace runs collapse to one space; the first 100 chars are kept.
    pub fn preview(&self) -> String {
        let normalized = WHITESPACE_RE.replace_all(&self.content, " ");
        normalized.trim().chars().take(PREVIEW_MAX_CHARS).collect()
    }
}

/// Applies the save-time title placeholder rule.
///
/// Only a strictly empty title is replaced; whitespace-only titles are kept
/// as typed.
pub fn normalize_title(title: String) -> String {
    if title.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        title
    }
}
