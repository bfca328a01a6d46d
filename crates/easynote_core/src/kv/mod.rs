//! Byte-oriented key-value persistence boundary.
//!
//! # Responsibility
//! - Define the async storage contract consumed by the note store.
//! - Ship memory, file and SQLite backed implementations.
//!
//! # Invariants
//! - Keys are restricted to `[A-Za-z0-9._-]` across all backends.
//! - `set` replaces the whole value or fails; readers never observe a
//!   partial write.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
mod memory;
mod sqlite;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

pub type KvResult<T> = Result<T, KvError>;

/// Transport error for key-value operations.
#[derive(Debug)]
pub enum KvError {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    /// A blocking storage task was cancelled or panicked.
    Task(tokio::task::JoinError),
    /// Key contains characters outside the allowed set.
    InvalidKey(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "storage task failed: {err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Task(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for KvError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<tokio::task::JoinError> for KvError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}

/// Asynchronous byte store contract.
///
/// Implementations must be shareable across tasks; the note store owns one
/// behind a `Box<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Replaces the value under `key` as one unit.
    async fn set(&self, key: &str, value: Vec<u8>) -> KvResult<()>;
}

/// Validates a storage key against the shared backend alphabet.
pub(crate) fn validate_key(key: &str) -> KvResult<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_key;

    #[test]
    fn validate_key_accepts_namespaced_names() {
        assert!(validate_key("easynote.notes").is_ok());
        assert!(validate_key("a-b_c.9").is_ok());
    }

    #[test]
    fn validate_key_rejects_empty_separators_and_non_ascii() {
        assert!(validate_key("").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a b").is_err());
        assert!(validate_key("käse").is_err());
    }
}
