//! Storage error types.

use thiserror::Error;

/// Storage operation result type.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from the underlying storage engine.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Record not found.
    #[error("Record not found: {entity_type} with key '{key}'")]
    NotFound {
        /// The type of entity (e.g., "Run").
        entity_type: &'static str,
        /// The key that was not found.
        key: String,
    },

    /// A key prefix matched more than one record.
    #[error("Ambiguous key '{prefix}': matches {count} records")]
    Ambiguous {
        /// The prefix that was looked up.
        prefix: String,
        /// Number of matching records.
        count: usize,
    },

    /// Key could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Creates a not-found error for a run key.
    #[must_use]
    pub fn run_not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Run",
            key: key.into(),
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            StorageError::Deserialization(err.to_string())
        } else {
            StorageError::Serialization(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StorageError::run_not_found("abc123");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Record not found: Run with key 'abc123'");
    }

    #[test]
    fn test_serde_error_classification() {
        let err: StorageError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, StorageError::Deserialization(_)));
    }
}
