//! RedbStorage implementation.
//!
//! Implements the AnalysisStore trait using redb as the underlying database.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use crate::adapter::{AnalysisStore, StorageStats};
use crate::error::StorageResult;
use crate::types::{AnalysisRecord, RunFilter, RunId};

// Run id (hyphenated) -> JSON-encoded AnalysisRecord
const RUNS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("runs");

/// Redb-based storage adapter.
///
/// This adapter uses redb, a pure-Rust embedded database, for persistent storage.
/// It provides ACID transactions and is suitable for single-process applications.
///
/// # Example
///
/// ```rust,no_run
/// use holdwise_storage::{AnalysisStore, RedbStorage};
///
/// let storage = RedbStorage::open("./holdwise.redb")?;
/// assert!(storage.is_healthy());
/// # Ok::<(), holdwise_storage::StorageError>(())
/// ```
pub struct RedbStorage {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStorage").field("path", &self.path).finish()
    }
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(&path)?;
        let storage = Self {
            db: Arc::new(db),
            path,
        };
        storage.initialize_tables()?;
        debug!(path = %storage.path.display(), "opened run store");
        Ok(storage)
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Initializes all required tables.
    fn initialize_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RUNS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl AnalysisStore for RedbStorage {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    fn is_healthy(&self) -> bool {
        self.db.begin_read().is_ok()
    }

    fn put(&self, record: &AnalysisRecord) -> StorageResult<()> {
        let data = serde_json::to_vec(record)?;
        let key = record.run_id.key();
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RUNS_TABLE)?;
            table.insert(key.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        debug!(run_id = %record.run_id, bytes = data.len(), "stored run");
        Ok(())
    }

    fn get(&self, run_id: &RunId) -> StorageResult<Option<AnalysisRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RUNS_TABLE)?;
        match table.get(run_id.key().as_str())? {
            Some(data) => {
                let record: AnalysisRecord = serde_json::from_slice(data.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, run_id: &RunId) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(RUNS_TABLE)?;
            let result = table.remove(run_id.key().as_str())?;
            result.is_some()
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    fn list(&self, filter: Option<&RunFilter>) -> StorageResult<Vec<AnalysisRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RUNS_TABLE)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: AnalysisRecord = serde_json::from_slice(value.value())?;
            records.push(record);
        }
        Ok(RunFilter::apply(filter, records))
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RUNS_TABLE)?;

        let mut payload_bytes = 0u64;
        for entry in table.iter()? {
            let (_, value) = entry?;
            payload_bytes += value.value().len() as u64;
        }

        Ok(StorageStats {
            run_count: table.len()? as usize,
            payload_bytes,
            file_size_bytes: std::fs::metadata(&self.path).ok().map(|m| m.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdwise_portfolio::analyze;
    use tempfile::{tempdir, TempDir};

    fn create_test_storage() -> (TempDir, RedbStorage) {
        let dir = tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("test.redb")).unwrap();
        (dir, storage)
    }

    fn record(text: &str) -> AnalysisRecord {
        AnalysisRecord::new(text, analyze(text).unwrap())
    }

    #[test]
    fn test_backend_name() {
        let (_dir, storage) = create_test_storage();
        assert_eq!(storage.backend_name(), "redb");
        assert!(storage.is_healthy());
    }

    #[test]
    fn test_run_crud() {
        let (_dir, storage) = create_test_storage();
        let rec = record("FZROX 40%, VTI 30%, BND 30%");

        storage.put(&rec).unwrap();
        let loaded = storage.get(&rec.run_id).unwrap().unwrap();
        assert_eq!(loaded, rec);

        assert!(storage.delete(&rec.run_id).unwrap());
        assert!(storage.get(&rec.run_id).unwrap().is_none());
        assert!(!storage.delete(&rec.run_id).unwrap());
    }

    #[test]
    fn test_list_and_stats() {
        let (_dir, storage) = create_test_storage();
        storage.put(&record("XLK 20%, AAPL 15%, MSFT 10%")).unwrap();
        storage.put(&record("SGOV 50%, VTI 50%")).unwrap();

        assert_eq!(storage.list(None).unwrap().len(), 2);
        assert_eq!(storage.count(Some(&RunFilter::new().ticker("SGOV"))).unwrap(), 1);

        let stats = storage.stats().unwrap();
        assert_eq!(stats.run_count, 2);
        assert!(stats.payload_bytes > 0);
        assert!(stats.file_size_bytes.unwrap() > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("runs.redb");
        let storage = RedbStorage::open(&path).unwrap();
        assert_eq!(storage.path(), path.as_path());
        assert!(path.exists());
    }
}
