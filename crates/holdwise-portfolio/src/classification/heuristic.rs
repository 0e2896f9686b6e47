//! Lowest-priority individual-stock rule.

use serde::{Deserialize, Serialize};

/// Tags an otherwise unknown ticker as an individual stock.
///
/// Consulted only after every registry table has missed. A ticker qualifies
/// when it is 1-5 characters, contains no `.`, and contains none of the
/// fund-suggestive markers (`ETF`, `FUND`, `BOND`, `IDX`, `SPDR`, `ISH`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualStockHeuristic {
    max_len: usize,
    fund_markers: Vec<String>,
}

impl Default for IndividualStockHeuristic {
    fn default() -> Self {
        Self {
            max_len: 5,
            fund_markers: ["ETF", "FUND", "BOND", "IDX", "SPDR", "ISH"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl IndividualStockHeuristic {
    /// Rule name, reported alongside heuristic classifications.
    pub const NAME: &'static str = "individual-stock-heuristic";

    /// Creates the heuristic with the standard markers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum ticker length.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Adds a fund-suggestive marker.
    #[must_use]
    pub fn with_fund_marker(mut self, marker: impl Into<String>) -> Self {
        self.fund_markers.push(marker.into().to_uppercase());
        self
    }

    /// Returns true if `ticker` looks like a single company's stock.
    #[must_use]
    pub fn applies(&self, ticker: &str) -> bool {
        let ticker = ticker.to_uppercase();
        let len = ticker.chars().count();
        (1..=self.max_len).contains(&len)
            && !ticker.contains('.')
            && !self
                .fund_markers
                .iter()
                .any(|marker| ticker.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tickers_qualify() {
        let rule = IndividualStockHeuristic::new();
        assert!(rule.applies("PLTR"));
        assert!(rule.applies("F"));
        assert!(rule.applies("SNOWX"));
    }

    #[test]
    fn test_length_and_dot_rejected() {
        let rule = IndividualStockHeuristic::new();
        assert!(!rule.applies(""));
        assert!(!rule.applies("ABCDEF"));
        assert!(!rule.applies("RDS.A"));
    }

    #[test]
    fn test_fund_markers_rejected() {
        let rule = IndividualStockHeuristic::new();
        for ticker in ["XETF", "FUNDX", "BONDS", "IDXQ", "SPDRG", "ISHG"] {
            assert!(!rule.applies(ticker), "{ticker} should look like a fund");
        }
    }

    #[test]
    fn test_custom_rule() {
        let rule = IndividualStockHeuristic::new()
            .with_max_len(4)
            .with_fund_marker("trst");
        assert!(!rule.applies("ABCDE"));
        assert!(!rule.applies("TRST"));
        assert!(rule.applies("ABCD"));
    }
}
