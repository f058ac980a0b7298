use crate::core::storage::KeyValueStorage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory storage; contents are lost when it is dropped.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        debug!("Storage SET for key: {}", key);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
