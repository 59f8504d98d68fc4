//! Durable key-value storage
//!
//! The timer persists a single string value under a fixed key. Anything that
//! can get, set and remove strings by key can back it.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// String key-value store with local-storage semantics
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
