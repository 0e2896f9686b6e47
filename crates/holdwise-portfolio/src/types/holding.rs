//! Holding types.

use super::{Category, Sector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single classified position in a portfolio.
///
/// Weights are percentages of the submitted portfolio and are not
/// normalized: a user who types `VTI 60%, BND 30%` gets a 90% total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Uppercase ticker symbol (1-6 chars, optionally with one `.`).
    pub ticker: String,

    /// Allocation percentage in `(0, 100]`.
    pub weight: f64,

    /// Exposure categories; may be empty for unknown tickers.
    pub categories: BTreeSet<Category>,

    /// Descriptive sector label.
    pub sector: Sector,
}

impl Holding {
    /// Creates an unclassified holding (no categories, sector `Other`).
    #[must_use]
    pub fn new(ticker: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
            categories: BTreeSet::new(),
            sector: Sector::Other,
        }
    }

    /// Adds a category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Replaces the category set.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Sets the sector label.
    #[must_use]
    pub fn with_sector(mut self, sector: Sector) -> Self {
        self.sector = sector;
        self
    }

    /// Returns true if the holding carries `category`.
    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Returns true if any category is bond-like.
    #[must_use]
    pub fn is_bond(&self) -> bool {
        self.categories.iter().any(Category::is_bond)
    }

    /// Returns true if any category is an equity exposure.
    #[must_use]
    pub fn is_equity(&self) -> bool {
        self.categories.iter().any(Category::is_equity)
    }

    /// Returns true for single-company stocks.
    #[must_use]
    pub fn is_individual_stock(&self) -> bool {
        self.has_category(Category::IndividualStock)
    }

    /// Returns the sector if this is a sector ETF.
    #[must_use]
    pub fn sector_etf(&self) -> Option<Sector> {
        self.categories.iter().find_map(Category::sector_etf)
    }

    /// Returns the `(ticker, weight)` pair used in findings.
    #[must_use]
    pub fn ticker_weight(&self) -> TickerWeight {
        TickerWeight::new(self.ticker.clone(), self.weight)
    }
}

/// A ticker paired with its portfolio weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerWeight {
    /// Ticker symbol.
    pub ticker: String,
    /// Allocation percentage.
    pub weight: f64,
}

impl TickerWeight {
    /// Creates a new ticker/weight pair.
    #[must_use]
    pub fn new(ticker: impl Into<String>, weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            weight,
        }
    }
}

/// Sums the weights of holdings matching `predicate`.
#[must_use]
pub fn total_weight_where<F>(holdings: &[Holding], predicate: F) -> f64
where
    F: Fn(&Holding) -> bool,
{
    holdings
        .iter()
        .filter(|h| predicate(h))
        .map(|h| h.weight)
        .sum()
}
