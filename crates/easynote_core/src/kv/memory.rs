//! In-memory key-value backend.

use super::{validate_key, KeyValueStore, KvResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// `HashMap` backend behind a shared async mutex.
///
/// Default ephemeral backend. Clones share one map, so a second handle over
/// the same backend observes what the first one persisted.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        validate_key(key)?;
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}
