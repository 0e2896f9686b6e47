//! Ticker classification against a registry.

use super::{CategoryRegistry, IndividualStockHeuristic};
use crate::parser::ParsedHoldings;
use crate::types::{Category, Holding, Sector, TickerWeight};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Matched a registry table.
    Registry,
    /// Tagged by the individual-stock heuristic.
    Heuristic,
    /// No rule matched.
    Unknown,
}

/// Categories and sector assigned to one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Exposure categories (possibly empty).
    pub categories: BTreeSet<Category>,
    /// Sector label.
    pub sector: Sector,
    /// Which rule produced the result.
    pub source: ClassificationSource,
}

impl Classification {
    /// Returns true if no category was assigned.
    #[must_use]
    pub fn is_unclassified(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Assigns categories and sectors to tickers.
///
/// Unknown tickers never fail: they get the heuristic's
/// `individual-stock` tag or an empty category set, with sector `Other`.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: CategoryRegistry,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl Classifier {
    /// Creates a classifier over `registry`.
    #[must_use]
    pub fn new(registry: CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Creates a classifier over the built-in tables.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CategoryRegistry::standard())
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Classifies a single ticker (case-insensitive).
    #[must_use]
    pub fn classify(&self, ticker: &str) -> Classification {
        let ticker = ticker.trim().to_uppercase();

        if self.registry.contains(&ticker) {
            let categories = self.registry.categories_of(&ticker);
            let sector = self.registry.sector_of(&ticker).unwrap_or_default();
            debug!(ticker = %ticker, ?categories, %sector, "registry match");
            return Classification {
                categories,
                sector,
                source: ClassificationSource::Registry,
            };
        }

        let heuristic_hit = self
            .registry
            .heuristic()
            .is_some_and(|rule| rule.applies(&ticker));
        if heuristic_hit {
            debug!(ticker = %ticker, rule = IndividualStockHeuristic::NAME, "heuristic match");
            return Classification {
                categories: BTreeSet::from([Category::IndividualStock]),
                sector: Sector::Other,
                source: ClassificationSource::Heuristic,
            };
        }

        debug!(ticker = %ticker, "unclassified ticker");
        Classification {
            categories: BTreeSet::new(),
            sector: Sector::Other,
            source: ClassificationSource::Unknown,
        }
    }

    /// Classifies ticker/weight entries into holdings, preserving order.
    #[must_use]
    pub fn classify_entries(&self, entries: &[TickerWeight]) -> Vec<Holding> {
        entries
            .iter()
            .map(|entry| {
                let classification = self.classify(&entry.ticker);
                Holding::new(entry.ticker.clone(), entry.weight)
                    .with_categories(classification.categories)
                    .with_sector(classification.sector)
            })
            .collect()
    }

    /// Classifies every parsed entry into a [`Holding`].
    #[must_use]
    pub fn classify_all(&self, parsed: &ParsedHoldings) -> Vec<Holding> {
        self.classify_entries(&parsed.entries)
    }
}
