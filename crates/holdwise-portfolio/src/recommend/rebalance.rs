//! Rebalance actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    /// Increase the position.
    Buy,
    /// Reduce or close the position.
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("Buy"),
            Self::Sell => f.write_str("Sell"),
        }
    }
}

/// One suggested trade.
///
/// `percentage` is a signed weight delta in portfolio percentage points:
/// negative for sells, positive for buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAction {
    /// Ticker to trade.
    pub ticker: String,
    /// Direction.
    pub action: TradeAction,
    /// Human-readable amount.
    pub amount: String,
    /// Signed weight delta.
    pub percentage: f64,
}

impl RebalanceAction {
    /// Sells `weight` points of `ticker`.
    #[must_use]
    pub fn sell(ticker: impl Into<String>, weight: f64, amount: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            action: TradeAction::Sell,
            amount: amount.into(),
            percentage: -weight.abs(),
        }
    }

    /// Buys `weight` points of `ticker`.
    #[must_use]
    pub fn buy(ticker: impl Into<String>, weight: f64, amount: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            action: TradeAction::Buy,
            amount: amount.into(),
            percentage: weight.abs(),
        }
    }

    /// Sells an entire position.
    #[must_use]
    pub fn sell_all(ticker: impl Into<String>, weight: f64) -> Self {
        let ticker = ticker.into();
        let amount = format!("Sell entire position ({weight:.1}%)");
        Self::sell(ticker, weight, amount)
    }

    /// Moves `weight` points into `ticker`.
    #[must_use]
    pub fn add_to(ticker: impl Into<String>, weight: f64) -> Self {
        let ticker = ticker.into();
        let amount = format!("Add {weight:.1}% of portfolio");
        Self::buy(ticker, weight, amount)
    }
}

/// Net weight change across `actions`.
#[must_use]
pub fn net_change(actions: &[RebalanceAction]) -> f64 {
    actions.iter().map(|a| a.percentage).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signs() {
        let sell = RebalanceAction::sell_all("VTI", 30.0);
        assert_eq!(sell.action, TradeAction::Sell);
        assert_relative_eq!(sell.percentage, -30.0);
        assert_eq!(sell.amount, "Sell entire position (30.0%)");

        let buy = RebalanceAction::add_to("FZROX", 30.0);
        assert_eq!(buy.action, TradeAction::Buy);
        assert_relative_eq!(buy.percentage, 30.0);
        assert_relative_eq!(net_change(&[sell, buy]), 0.0);
    }
}
