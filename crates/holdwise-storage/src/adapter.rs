//! Storage adapter trait definition.
//!
//! This module defines the core `AnalysisStore` trait that all storage
//! backends must implement.

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::types::{AnalysisRecord, RunFilter, RunId};

/// Key-record store for analysis runs.
///
/// All storage backends (redb, in-memory) implement this trait. Methods are
/// synchronous; the embedded backend commits each write in its own
/// transaction.
///
/// # Example
///
/// ```rust
/// use holdwise_storage::{AnalysisRecord, AnalysisStore, InMemoryStorage};
///
/// let storage = InMemoryStorage::new();
/// let text = "FZROX 40%, VTI 30%, BND 30%";
/// let record = AnalysisRecord::new(text, holdwise_portfolio::analyze(text).unwrap());
/// storage.put(&record).unwrap();
///
/// let loaded = storage.get(&record.run_id).unwrap().unwrap();
/// assert_eq!(loaded.input, text);
/// ```
pub trait AnalysisStore: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Checks if the storage is healthy and accessible.
    fn is_healthy(&self) -> bool;

    /// Stores a record under its run id.
    ///
    /// If a record with the same id exists, it is replaced.
    fn put(&self, record: &AnalysisRecord) -> StorageResult<()>;

    /// Retrieves a record by run id.
    fn get(&self, run_id: &RunId) -> StorageResult<Option<AnalysisRecord>>;

    /// Deletes a record; returns whether it existed.
    fn delete(&self, run_id: &RunId) -> StorageResult<bool>;

    /// Lists records newest first, optionally filtered.
    fn list(&self, filter: Option<&RunFilter>) -> StorageResult<Vec<AnalysisRecord>>;

    /// Returns storage statistics.
    fn stats(&self) -> StorageResult<StorageStats>;

    /// Counts records matching the filter.
    fn count(&self, filter: Option<&RunFilter>) -> StorageResult<usize> {
        Ok(self.list(filter)?.len())
    }

    /// Retrieves a record, failing with [`StorageError::NotFound`] if absent.
    fn require(&self, run_id: &RunId) -> StorageResult<AnalysisRecord> {
        self.get(run_id)?
            .ok_or_else(|| StorageError::run_not_found(run_id.to_string()))
    }

    /// Resolves a full id or a unique id prefix to a run id.
    fn resolve(&self, key: &str) -> StorageResult<RunId> {
        if let Ok(run_id) = key.parse::<RunId>() {
            return Ok(run_id);
        }
        let prefix = key.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let matches: Vec<RunId> = self
            .list(None)?
            .into_iter()
            .map(|r| r.run_id)
            .filter(|id| id.key().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [] => Err(StorageError::run_not_found(key)),
            [only] => Ok(*only),
            _ => Err(StorageError::Ambiguous {
                prefix,
                count: matches.len(),
            }),
        }
    }
}

/// Storage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    /// Number of stored runs.
    pub run_count: usize,
    /// Total size of the stored JSON payloads in bytes.
    pub payload_bytes: u64,
    /// Database file size in bytes (if applicable).
    pub file_size_bytes: Option<u64>,
}
