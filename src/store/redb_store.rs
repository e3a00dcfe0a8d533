use super::KvStore;
use crate::error::{ReportcardError, Result};
use redb::{Database, TableDefinition};
use std::path::Path;
use std::sync::RwLock;

const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Embedded durable store: one redb file, one table.
pub struct RedbStore {
    db: RwLock<Option<Database>>,
}

impl RedbStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path).map_err(ReportcardError::store)?;
        tracing::debug!("opened redb store at {}", path.display());
        Ok(Self {
            db: RwLock::new(Some(db)),
        })
    }
}

fn closed() -> ReportcardError {
    ReportcardError::Store("redb store is closed".to_string())
}

impl KvStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let guard = self.db.read().map_err(ReportcardError::store)?;
        let db = guard.as_ref().ok_or_else(closed)?;

        let read_txn = db.begin_read().map_err(ReportcardError::store)?;
        let table = match read_txn.open_table(KV_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(ReportcardError::store(e)),
        };
        let value = table.get(key).map_err(ReportcardError::store)?;
        Ok(value.map(|entry| entry.value().to_vec()))
    }

    fn update(&self, key: &str, value: &[u8]) -> Result<()> {
        let guard = self.db.read().map_err(ReportcardError::store)?;
        let db = guard.as_ref().ok_or_else(closed)?;

        let write_txn = db.begin_write().map_err(ReportcardError::store)?;
        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .map_err(ReportcardError::store)?;
            table.insert(key, value).map_err(ReportcardError::store)?;
        }
        write_txn.commit().map_err(ReportcardError::store)?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.db.write().map_err(ReportcardError::store)?;
        // redb flushes on drop
        guard.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_database_reads_as_empty() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = RedbStore::open(&dir.path().join("cache.redb")).expect("store should open");
        assert_eq!(store.get("recent").expect("get should succeed"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("nested/cache.redb");
        {
            let store = RedbStore::open(&path).expect("store should open");
            store.update("key", b"val").expect("write should succeed");
            store
                .update("key2", br#"[{"repo":"github.com/acme/widget"}]"#)
                .expect("write should succeed");
            store.close().expect("close should succeed");
        }

        let store = RedbStore::open(&path).expect("store should reopen");
        assert_eq!(
            store.get("key").expect("get should succeed").as_deref(),
            Some(&b"val"[..])
        );
        assert!(store.get("key2").expect("get should succeed").is_some());
        assert_eq!(store.get("not-ex").expect("get should succeed"), None);
    }

    #[test]
    fn closed_store_rejects_calls() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = RedbStore::open(&dir.path().join("cache.redb")).expect("store should open");
        store.close().expect("close should succeed");
        assert!(matches!(store.get("key"), Err(ReportcardError::Store(_))));
    }
}
