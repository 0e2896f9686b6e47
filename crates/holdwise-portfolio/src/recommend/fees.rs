//! Expense ratio lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annual expense ratios in percent (e.g. `0.03` for 3 bps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    ratios: BTreeMap<String, f64>,
    fallback: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl FeeSchedule {
    /// Fallback ratio used when no table is configured.
    pub const DEFAULT_FALLBACK: f64 = 0.10;

    /// An empty table where every ticker costs `fallback`.
    #[must_use]
    pub fn empty(fallback: f64) -> Self {
        Self {
            ratios: BTreeMap::new(),
            fallback,
        }
    }

    /// Built-in ratios for common broad-market and Nasdaq-100 funds.
    #[must_use]
    pub fn standard() -> Self {
        [
            ("FZROX", 0.0),
            ("FSKAX", 0.015),
            ("VTI", 0.03),
            ("VTSAX", 0.04),
            ("ITOT", 0.03),
            ("SCHB", 0.03),
            ("SPLG", 0.02),
            ("SPTM", 0.03),
            ("SWTSX", 0.03),
            ("IWV", 0.20),
            ("QQQ", 0.20),
            ("QQQM", 0.15),
            ("VOO", 0.03),
            ("IVV", 0.03),
            ("SPY", 0.0945),
            ("FXAIX", 0.015),
        ]
        .into_iter()
        .fold(Self::empty(Self::DEFAULT_FALLBACK), |fees, (ticker, ratio)| {
            fees.with_ratio(ticker, ratio)
        })
    }

    /// Adds or replaces a ticker's ratio.
    #[must_use]
    pub fn with_ratio(mut self, ticker: impl Into<String>, ratio: f64) -> Self {
        self.ratios.insert(ticker.into().to_uppercase(), ratio);
        self
    }

    /// Sets the fallback ratio for unknown tickers.
    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Known ratio for `ticker`, if listed.
    #[must_use]
    pub fn known(&self, ticker: &str) -> Option<f64> {
        self.ratios.get(ticker).copied()
    }

    /// Ratio for `ticker`, falling back for unknown tickers.
    #[must_use]
    pub fn expense_ratio(&self, ticker: &str) -> f64 {
        self.known(ticker).unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_lookups() {
        let fees = FeeSchedule::standard();
        assert_relative_eq!(fees.expense_ratio("FZROX"), 0.0);
        assert_relative_eq!(fees.expense_ratio("SPY"), 0.0945);
        assert_relative_eq!(fees.expense_ratio("ZZZZ"), FeeSchedule::DEFAULT_FALLBACK);
        assert!(fees.known("ZZZZ").is_none());
    }

    #[test]
    fn test_overrides() {
        let fees = FeeSchedule::standard()
            .with_ratio("vti", 0.01)
            .with_fallback(0.5);
        assert_relative_eq!(fees.expense_ratio("VTI"), 0.01);
        assert_relative_eq!(fees.expense_ratio("NEW"), 0.5);
    }
}
