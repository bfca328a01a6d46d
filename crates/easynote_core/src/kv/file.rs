//! One-file-per-key backend under a root directory.
//!
//! # Invariants
//! - The key alphabet keeps every entry a plain file name, never a path.
//! - Writes land in a staging file first and are renamed into place, so a
//!   crash mid-write never corrupts the live entry.

use super::{validate_key, KeyValueStore, KvResult};
use async_trait::async_trait;
use log::info;
use std::path::PathBuf;
use tokio::fs;

/// Filesystem backend; each key maps to `<root>/<key>`.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Opens the backend, creating `root` when missing.
    ///
    /// # Side effects
    /// - Emits a `kv_open` logging event.
    pub async fn open(root: impl Into<PathBuf>) -> KvResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(
            "event=kv_open module=kv status=ok backend=file root={}",
            root.display()
        );
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl KeyValueStore for FileKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        validate_key(key)?;
        // `~` sits outside the key alphabet, so the staging name cannot
        // collide with another live entry.
        let staged = self.root.join(format!("{key}~"));
        fs::write(&staged, &value).await?;
        if let Err(err) = fs::rename(&staged, self.entry_path(key)).await {
            // The staging file is garbage after a failed rename.
            let _ = fs::remove_file(&staged).await;
            return Err(err.into());
        }
        Ok(())
    }
}
