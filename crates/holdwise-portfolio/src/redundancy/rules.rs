//! Overlap rules.
//!
//! Each rule inspects the full holdings list and reports zero or more
//! [`Overlap`]s. Rules never depend on each other; the
//! [`OverlapDetector`](super::OverlapDetector) runs them in registration order.

use super::{Overlap, OverlapKind};
use crate::types::{Category, Holding, Sector, TickerWeight};
use std::collections::BTreeSet;
use std::fmt;

/// A single overlap check.
pub trait OverlapRule: fmt::Debug + Send + Sync {
    /// Short rule name for logs.
    fn name(&self) -> &'static str;

    /// Returns every overlap this rule finds, in a deterministic order.
    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap>;
}

fn collect<F>(holdings: &[Holding], predicate: F) -> Vec<TickerWeight>
where
    F: Fn(&Holding) -> bool,
{
    holdings
        .iter()
        .filter(|h| predicate(h))
        .map(Holding::ticker_weight)
        .collect()
}

/// Two or more holdings in the same category.
#[derive(Debug, Clone)]
pub struct CategoryDuplicationRule {
    categories: Vec<Category>,
}

impl Default for CategoryDuplicationRule {
    fn default() -> Self {
        Self::new(Category::DUPLICATION_CHECKED)
    }
}

impl CategoryDuplicationRule {
    /// Checks the given categories, reporting in that order.
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }
}

impl OverlapRule for CategoryDuplicationRule {
    fn name(&self) -> &'static str {
        "category-duplication"
    }

    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap> {
        self.categories
            .iter()
            .filter_map(|&category| {
                let tickers = collect(holdings, |h| h.has_category(category));
                (tickers.len() >= 2).then(|| Overlap::new(OverlapKind::Duplication(category), tickers))
            })
            .collect()
    }
}

/// A U.S. aggregate bond fund held alongside a global bond fund.
#[derive(Debug, Clone, Copy, Default)]
pub struct BondOverlapRule;

impl OverlapRule for BondOverlapRule {
    fn name(&self) -> &'static str {
        "bond-overlap"
    }

    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap> {
        let has_us = holdings
            .iter()
            .any(|h| h.has_category(Category::BondAggregateUs));
        let has_global = holdings.iter().any(|h| h.has_category(Category::BondGlobal));
        if !(has_us && has_global) {
            return Vec::new();
        }

        let tickers = collect(holdings, |h| {
            h.has_category(Category::BondAggregateUs) || h.has_category(Category::BondGlobal)
        });
        vec![Overlap::new(OverlapKind::BondOverlap, tickers)]
    }
}

/// A sector ETF held alongside individual stocks from the same sector.
#[derive(Debug, Clone)]
pub struct SectorClusterRule {
    sectors: Vec<Sector>,
}

impl Default for SectorClusterRule {
    fn default() -> Self {
        Self::new(Sector::CLUSTERED)
    }
}

impl SectorClusterRule {
    /// Checks the given sectors, reporting in that order.
    #[must_use]
    pub fn new(sectors: impl IntoIterator<Item = Sector>) -> Self {
        Self {
            sectors: sectors.into_iter().collect(),
        }
    }
}

impl OverlapRule for SectorClusterRule {
    fn name(&self) -> &'static str {
        "sector-cluster"
    }

    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap> {
        self.sectors
            .iter()
            .filter_map(|&sector| {
                let is_etf = |h: &Holding| h.sector_etf() == Some(sector);
                let is_stock = |h: &Holding| h.is_individual_stock() && h.sector == sector;

                let has_etf = holdings.iter().any(is_etf);
                let has_stock = holdings.iter().any(is_stock);
                (has_etf && has_stock).then(|| {
                    let tickers = collect(holdings, |h| is_etf(h) || is_stock(h));
                    Overlap::new(OverlapKind::SectorCluster(sector), tickers)
                })
            })
            .collect()
    }
}

/// Dividend-factor and quality-factor funds held together.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorOverlapRule;

impl OverlapRule for FactorOverlapRule {
    fn name(&self) -> &'static str {
        "factor-overlap"
    }

    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap> {
        let has_dividend = holdings
            .iter()
            .any(|h| h.has_category(Category::DividendFactor));
        let has_quality = holdings
            .iter()
            .any(|h| h.has_category(Category::QualityFactor));
        if !(has_dividend && has_quality) {
            return Vec::new();
        }

        let tickers = collect(holdings, |h| {
            h.has_category(Category::DividendFactor) || h.has_category(Category::QualityFactor)
        });
        vec![Overlap::new(OverlapKind::FactorOverlap, tickers)]
    }
}

/// A broad-market or S&P 500 fund held alongside several sector ETFs.
#[derive(Debug, Clone, Copy)]
pub struct HiddenOverlapRule {
    min_sector_etfs: usize,
}

impl Default for HiddenOverlapRule {
    fn default() -> Self {
        Self { min_sector_etfs: 3 }
    }
}

impl HiddenOverlapRule {
    /// Fires once `min_sector_etfs` sector ETFs sit beside a broad index.
    #[must_use]
    pub fn new(min_sector_etfs: usize) -> Self {
        Self { min_sector_etfs }
    }
}

impl OverlapRule for HiddenOverlapRule {
    fn name(&self) -> &'static str {
        "hidden-overlap"
    }

    fn evaluate(&self, holdings: &[Holding]) -> Vec<Overlap> {
        let is_broad = |h: &Holding| {
            h.has_category(Category::BroadMarket) || h.has_category(Category::Sp500Index)
        };

        let sector_etfs: BTreeSet<&str> = holdings
            .iter()
            .filter(|h| h.sector_etf().is_some())
            .map(|h| h.ticker.as_str())
            .collect();
        if !holdings.iter().any(is_broad) || sector_etfs.len() < self.min_sector_etfs {
            return Vec::new();
        }

        let tickers = collect(holdings, |h| is_broad(h) || h.sector_etf().is_some());
        vec![Overlap::new(OverlapKind::HiddenOverlap, tickers)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(ticker: &str, weight: f64, category: Category, sector: Sector) -> Holding {
        Holding::new(ticker, weight)
            .with_category(category)
            .with_sector(sector)
    }

    fn stock(ticker: &str, weight: f64, sector: Sector) -> Holding {
        holding(ticker, weight, Category::IndividualStock, sector)
    }

    fn sector_etf(ticker: &str, weight: f64, sector: Sector) -> Holding {
        holding(ticker, weight, Category::SectorEtf(sector), sector)
    }

    #[test]
    fn test_duplication_needs_two() {
        let rule = CategoryDuplicationRule::default();
        let one = vec![holding("VTI", 50.0, Category::BroadMarket, Sector::BroadMarket)];
        assert!(rule.evaluate(&one).is_empty());

        let two = vec![
            holding("FZROX", 40.0, Category::BroadMarket, Sector::BroadMarket),
            holding("VTI", 30.0, Category::BroadMarket, Sector::BroadMarket),
        ];
        let overlaps = rule.evaluate(&two);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].kind, OverlapKind::Duplication(Category::BroadMarket));
    }

    #[test]
    fn test_duplication_ignores_unchecked_categories() {
        let rule = CategoryDuplicationRule::default();
        let holdings = vec![
            holding("BNDW", 20.0, Category::BondGlobal, Sector::FixedIncome),
            holding("BNDX", 20.0, Category::BondGlobal, Sector::FixedIncome),
        ];
        assert!(rule.evaluate(&holdings).is_empty());
    }

    #[test]
    fn test_bond_overlap() {
        let holdings = vec![
            holding("BND", 20.0, Category::BondAggregateUs, Sector::FixedIncome),
            holding("VTI", 60.0, Category::BroadMarket, Sector::BroadMarket),
            holding("BNDX", 20.0, Category::BondGlobal, Sector::FixedIncome),
        ];
        let overlaps = BondOverlapRule.evaluate(&holdings);
        assert_eq!(overlaps.len(), 1);
        let tickers: Vec<_> = overlaps[0].tickers.iter().map(|t| t.ticker.as_str()).collect();
        assert_eq!(tickers, ["BND", "BNDX"]);
    }

    #[test]
    fn test_sector_cluster_needs_etf_and_stock() {
        let rule = SectorClusterRule::default();
        let stocks_only = vec![
            stock("AAPL", 15.0, Sector::Technology),
            stock("MSFT", 10.0, Sector::Technology),
        ];
        assert!(rule.evaluate(&stocks_only).is_empty());

        let cluster = vec![
            sector_etf("XLV", 10.0, Sector::Healthcare),
            stock("JNJ", 5.0, Sector::Healthcare),
            stock("AAPL", 5.0, Sector::Technology),
        ];
        let overlaps = rule.evaluate(&cluster);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].kind, OverlapKind::SectorCluster(Sector::Healthcare));
        assert_eq!(overlaps[0].tickers.len(), 2);
    }

    #[test]
    fn test_factor_overlap() {
        let holdings = vec![
            holding("SCHD", 30.0, Category::DividendFactor, Sector::BroadMarket),
            holding("QUAL", 20.0, Category::QualityFactor, Sector::BroadMarket),
        ];
        assert_eq!(FactorOverlapRule.evaluate(&holdings).len(), 1);
        assert!(FactorOverlapRule.evaluate(&holdings[..1]).is_empty());
    }

    #[test]
    fn test_hidden_overlap() {
        let mut holdings = vec![
            holding("VOO", 40.0, Category::Sp500Index, Sector::BroadMarket),
            sector_etf("XLK", 20.0, Sector::Technology),
            sector_etf("XLV", 20.0, Sector::Healthcare),
        ];
        let rule = HiddenOverlapRule::default();
        assert!(rule.evaluate(&holdings).is_empty());

        holdings.push(sector_etf("XLE", 20.0, Sector::Energy));
        let overlaps = rule.evaluate(&holdings);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].tickers.len(), 4);
        assert_eq!(overlaps[0].tickers[0].ticker, "VOO");
    }
}
