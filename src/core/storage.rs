//! Durable key-value storage abstraction

use anyhow::Result;

/// A string-valued key-value store whose writes are durable once `set`
/// returns.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}
