//! Ticker classification.
//!
//! Classification is table-driven. A [`CategoryRegistry`] holds the lookup
//! tables and an optional [`IndividualStockHeuristic`], consulted only when
//! every table misses. The [`Classifier`] applies a registry to parsed
//! entries and produces [`Holding`](crate::types::Holding)s.

mod classifier;
mod heuristic;
mod registry;

pub use classifier::{Classification, ClassificationSource, Classifier};
pub use heuristic::IndividualStockHeuristic;
pub use registry::{CategoryRegistry, CategoryRegistryBuilder};
