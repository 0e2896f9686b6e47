//! In-memory storage adapter.
//!
//! Provides a simple in-memory implementation of the AnalysisStore trait.
//! Useful for testing and development. Data is not persisted across restarts.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::adapter::{AnalysisStore, StorageStats};
use crate::error::{StorageError, StorageResult};
use crate::types::{AnalysisRecord, RunFilter, RunId};

/// In-memory storage adapter.
///
/// This adapter stores all records in a map guarded by an `RwLock`.
///
/// # Example
///
/// ```rust
/// use holdwise_storage::{AnalysisStore, InMemoryStorage};
///
/// let storage = InMemoryStorage::new();
/// assert!(storage.is_healthy());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    runs: RwLock<HashMap<RunId, AnalysisRecord>>,
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all data from storage.
    pub fn clear(&self) -> StorageResult<()> {
        self.runs.write().map_err(lock_error)?.clear();
        Ok(())
    }
}

impl AnalysisStore for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_healthy(&self) -> bool {
        self.runs.read().is_ok()
    }

    fn put(&self, record: &AnalysisRecord) -> StorageResult<()> {
        self.runs
            .write()
            .map_err(lock_error)?
            .insert(record.run_id, record.clone());
        Ok(())
    }

    fn get(&self, run_id: &RunId) -> StorageResult<Option<AnalysisRecord>> {
        Ok(self.runs.read().map_err(lock_error)?.get(run_id).cloned())
    }

    fn delete(&self, run_id: &RunId) -> StorageResult<bool> {
        Ok(self
            .runs
            .write()
            .map_err(lock_error)?
            .remove(run_id)
            .is_some())
    }

    fn list(&self, filter: Option<&RunFilter>) -> StorageResult<Vec<AnalysisRecord>> {
        let records: Vec<AnalysisRecord> = self
            .runs
            .read()
            .map_err(lock_error)?
            .values()
            .cloned()
            .collect();
        Ok(RunFilter::apply(filter, records))
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        let runs = self.runs.read().map_err(lock_error)?;
        let mut payload_bytes = 0u64;
        for record in runs.values() {
            payload_bytes += serde_json::to_vec(record)?.len() as u64;
        }
        Ok(StorageStats {
            run_count: runs.len(),
            payload_bytes,
            file_size_bytes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdwise_portfolio::analyze;

    fn record(text: &str) -> AnalysisRecord {
        AnalysisRecord::new(text, analyze(text).unwrap())
    }

    #[test]
    fn test_in_memory_backend_name() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.backend_name(), "memory");
        assert!(storage.is_healthy());
    }

    #[test]
    fn test_in_memory_crud() {
        let storage = InMemoryStorage::new();
        let rec = record("FZROX 40%, VTI 30%, BND 30%");

        storage.put(&rec).unwrap();
        assert_eq!(storage.get(&rec.run_id).unwrap(), Some(rec.clone()));

        assert!(storage.delete(&rec.run_id).unwrap());
        assert!(!storage.delete(&rec.run_id).unwrap());
        assert!(storage.get(&rec.run_id).unwrap().is_none());
        assert!(storage.require(&rec.run_id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_in_memory_put_replaces() {
        let storage = InMemoryStorage::new();
        let rec = record("VTI 100%");
        storage.put(&rec).unwrap();
        storage.put(&rec.clone().with_label("renamed")).unwrap();

        assert_eq!(storage.count(None).unwrap(), 1);
        assert_eq!(
            storage.require(&rec.run_id).unwrap().label.as_deref(),
            Some("renamed")
        );
    }

    #[test]
    fn test_in_memory_resolve_prefix() {
        let storage = InMemoryStorage::new();
        let rec = record("SGOV 50%, VTI 50%");
        storage.put(&rec).unwrap();

        assert_eq!(storage.resolve(&rec.run_id.short()).unwrap(), rec.run_id);
        assert_eq!(storage.resolve(&rec.run_id.to_string()).unwrap(), rec.run_id);
        assert!(storage.resolve("zzzz").unwrap_err().is_not_found());
        assert!(matches!(
            storage.resolve("  ").unwrap_err(),
            StorageError::InvalidKey(_)
        ));
    }

    #[test]
    fn test_in_memory_list_filter() {
        let storage = InMemoryStorage::new();
        storage.put(&record("XLK 20%, AAPL 15%, MSFT 10%")).unwrap();
        storage.put(&record("VTI 60%, BND 40%")).unwrap();

        assert_eq!(storage.list(None).unwrap().len(), 2);
        let tech = storage.list(Some(&RunFilter::new().ticker("AAPL"))).unwrap();
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].analysis.holdings[0].ticker, "XLK");
    }

    #[test]
    fn test_in_memory_clear_and_stats() {
        let storage = InMemoryStorage::new();
        storage.put(&record("VTI 100%")).unwrap();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.run_count, 1);
        assert!(stats.payload_bytes > 0);

        storage.clear().unwrap();
        assert_eq!(storage.stats().unwrap(), StorageStats::default());
    }
}
