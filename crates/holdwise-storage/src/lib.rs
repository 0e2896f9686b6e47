//! Holdwise Storage Layer
//!
//! This crate persists portfolio analysis runs so they can be listed,
//! inspected and deleted later. Each run is keyed by a [`RunId`] and stores
//! the raw holdings text alongside the full
//! [`PortfolioAnalysis`](holdwise_portfolio::PortfolioAnalysis).
//!
//! # Example
//!
//! ```rust
//! use holdwise_storage::{AnalysisRecord, AnalysisStore, InMemoryStorage};
//!
//! let storage = InMemoryStorage::new();
//!
//! let text = "XLK 20%, AAPL 15%, MSFT 10%";
//! let analysis = holdwise_portfolio::analyze(text)?;
//! let record = AnalysisRecord::new(text, analysis).with_label("brokerage");
//! storage.put(&record)?;
//!
//! let runs = storage.list(None)?;
//! assert_eq!(runs.len(), 1);
//! assert_eq!(runs[0].summary().findings, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Storage Backends
//!
//! ## RedbStorage (Default)
//!
//! Uses [redb](https://crates.io/crates/redb), a pure-Rust embedded database
//! with ACID transactions. Records are stored as JSON bytes.
//!
//! ## InMemoryStorage
//!
//! A simple in-memory implementation for testing and development.
//! Data is not persisted across restarts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod adapter;
mod error;
mod memory;
mod redb;
mod types;

// Re-export core types
pub use adapter::{AnalysisStore, StorageStats};
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use redb::RedbStorage;
pub use types::{AnalysisRecord, RunFilter, RunId, RunSummary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::{AnalysisStore, StorageStats};
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::memory::InMemoryStorage;
    pub use crate::redb::RedbStorage;
    pub use crate::types::{AnalysisRecord, RunFilter, RunId, RunSummary};
}
