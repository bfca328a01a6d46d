//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist entries in a single `kv(key TEXT PRIMARY KEY, value BLOB)` table.
//! - Bridge blocking SQLite calls onto the runtime's blocking pool.
//!
//! # Invariants
//! - `set` is an upsert; exactly one row per key.
//! - The connection sits behind a mutex; clones share it.

use super::{validate_key, KeyValueStore, KvResult};
use async_trait::async_trait;
use log::{error, info};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::task;

const KV_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value BLOB NOT NULL
);";

const KV_UPSERT_SQL: &str = "INSERT INTO kv (key, value)
 VALUES (?1, ?2)
 ON CONFLICT(key) DO UPDATE SET value = excluded.value;";

/// Durable single-table store over a shared SQLite connection.
#[derive(Clone)]
pub struct SqliteKv {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    /// Opens a database file, creating it and the `kv` table when missing.
    ///
    /// # Side effects
    /// - Emits `kv_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Self::bootstrap("file", || Connection::open(path))
    }

    /// Opens an in-memory database with the `kv` table applied.
    ///
    /// Data lives as long as any clone of the returned store.
    pub fn open_in_memory() -> KvResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    fn bootstrap<F>(mode: &'static str, open: F) -> KvResult<Self>
    where
        F: FnOnce() -> rusqlite::Result<Connection>,
    {
        let started_at = Instant::now();
        let prepared = open().and_then(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch(KV_SCHEMA_SQL)?;
            Ok(conn)
        });

        match prepared {
            Ok(conn) => {
                info!(
                    "event=kv_open module=kv status=ok backend=sqlite mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    conn: Arc::new(Mutex::new(conn)),
                })
            }
            Err(err) => {
                error!(
                    "event=kv_open module=kv status=error backend=sqlite mode={mode} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        validate_key(key)?;
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        task::spawn_blocking(move || -> KvResult<Option<Vec<u8>>> {
            let conn = lock_connection(&conn);
            let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1;")?;
            let mut rows = stmt.query(params![key])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(row.get(0)?));
            }
            Ok(None)
        })
        .await?
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        validate_key(key)?;
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();

        task::spawn_blocking(move || -> KvResult<()> {
            let conn = lock_connection(&conn);
            conn.execute(KV_UPSERT_SQL, params![key, value])?;
            Ok(())
        })
        .await?
    }
}

// A poisoned lock only means another holder panicked; the connection itself
// stays usable.
fn lock_connection(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
