use crate::core::storage::KeyValueStorage;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "local_storage";

/// fjall-backed storage. Every `set` is synced to disk before returning.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStorage {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let partition =
            keyspace.open_partition(PARTITION_NAME, PartitionCreateOptions::default())?;
        debug!("Opened storage at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStorage for DiskStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key.as_bytes())? {
            Some(value) => {
                let text = String::from_utf8(value.to_vec())
                    .with_context(|| format!("Stored value for {key} is not UTF-8"))?;
                debug!("Storage HIT for key: {}", key);
                Ok(Some(text))
            }
            None => {
                debug!("Storage MISS for key: {}", key);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Storage SET for key: {}", key);
        Ok(())
    }
}
