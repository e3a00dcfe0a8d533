use super::KvStore;
use crate::error::{ReportcardError, Result};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<Option<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn closed() -> ReportcardError {
    ReportcardError::Store("memory store is closed".to_string())
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let guard = self.entries.read().map_err(ReportcardError::store)?;
        let entries = guard.as_ref().ok_or_else(closed)?;
        Ok(entries.get(key).cloned())
    }

    fn update(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut guard = self.entries.write().map_err(ReportcardError::store)?;
        let entries = guard.as_mut().ok_or_else(closed)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.entries.write().map_err(ReportcardError::store)?;
        *guard = None;
        Ok(())
    }
}
