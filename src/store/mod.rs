//! Key-value persistence behind the result cache.
//!
//! The pipeline only talks to [`KvStore`]; backends are picked at startup.

pub mod memory;
pub mod redb_store;

use crate::error::Result;
use crate::types::config::{StorageBackend, StorageConfig};
use std::path::Path;

pub use self::memory::MemoryStore;
pub use self::redb_store::RedbStore;

/// Generic get/put/close backend. Implementations do their own locking and
/// are shared across request threads.
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn update(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Releases the backend. Later calls fail with a store error.
    fn close(&self) -> Result<()>;
}

/// Opens the configured backend. Relative store paths resolve against `root`.
pub fn open(config: &StorageConfig, root: &Path) -> Result<Box<dyn KvStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::Redb => {
            let path = if config.path.is_absolute() {
                config.path.clone()
            } else {
                root.join(&config.path)
            };
            Ok(Box::new(RedbStore::open(&path)?))
        }
    }
}
