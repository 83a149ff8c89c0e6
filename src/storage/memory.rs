use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{StateStore, KEY_PREFIX};
use crate::error::{StorageError, StorageResult};

/// In-memory state store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }

    /// Read one raw entry
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locked(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| StorageError::Query {
            message: "state map lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> StorageResult<HashMap<String, String>> {
        Ok(self
            .locked()?
            .iter()
            .filter(|(k, _)| k.starts_with(KEY_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        self.locked()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.locked()?.remove(key);
        Ok(())
    }
}
