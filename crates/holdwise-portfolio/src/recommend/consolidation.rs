//! Keep/sell selection for overlapping holdings.

use super::fees::FeeSchedule;
use super::rebalance::RebalanceAction;
use crate::redundancy::{Overlap, OverlapKind};
use crate::types::{Category, Holding, TickerWeight};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A suggestion to fold overlapping holdings into one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationSuggestion {
    /// Human label of the overlapping exposure.
    pub category: String,
    /// Ticker to keep.
    pub keep: String,
    /// Tickers to sell, in input order.
    pub sell: Vec<String>,
    /// Why `keep` was chosen.
    pub reason: String,
    /// Estimated annual fee savings, in percent of the portfolio.
    pub savings: Option<f64>,
}

/// How the kept ticker was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeepBasis {
    LowestFee,
    Flagship,
    Structural,
    FirstListed,
}

/// Picks which holding to keep from an overlap.
#[derive(Debug, Clone)]
pub struct KeepPolicy {
    fees: FeeSchedule,
    flagships: HashMap<Category, Vec<&'static str>>,
}

impl Default for KeepPolicy {
    fn default() -> Self {
        Self::new(FeeSchedule::standard())
    }
}

/// Consolidation suggestion plus the trades that carry it out.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidationPlan {
    /// The suggestion.
    pub suggestion: ConsolidationSuggestion,
    /// Sells for every dropped holding, then one buy for the kept one.
    pub actions: Vec<RebalanceAction>,
}

impl KeepPolicy {
    /// Creates a policy with the standard flagship preferences.
    #[must_use]
    pub fn new(fees: FeeSchedule) -> Self {
        let flagships = HashMap::from([
            (Category::Sp500Index, vec!["VOO", "IVV", "SPLG", "SPY", "FXAIX"]),
            (Category::BondAggregateUs, vec!["BND", "AGG", "SCHZ", "FBND"]),
            (Category::BondGlobal, vec!["BNDW", "BNDX", "IAGG"]),
            (Category::TreasuryShort, vec!["SGOV", "BIL", "SHV"]),
            (Category::Tips, vec!["SCHP", "VTIP", "TIP"]),
            (Category::InternationalEquity, vec!["VXUS", "IXUS", "VEA"]),
            (Category::DividendFactor, vec!["SCHD", "VYM", "DGRO"]),
            (Category::Gold, vec!["GLDM", "IAU", "GLD"]),
            (Category::RealEstate, vec!["VNQ", "SCHH"]),
        ]);
        Self { fees, flagships }
    }

    /// The fee table in use.
    #[must_use]
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Returns true if keep selection for `category` is driven by fees.
    #[must_use]
    pub fn is_fee_sensitive(category: Category) -> bool {
        matches!(category, Category::BroadMarket | Category::Nasdaq100Index)
    }

    /// Builds the consolidation for one overlap.
    ///
    /// When no preferred keep can be found, or it would leave nothing to sell,
    /// the first-listed ticker is kept and the rest are sold. Returns `None`
    /// only for an overlap with fewer than two tickers.
    #[must_use]
    pub fn consolidate(
        &self,
        label: &str,
        overlap: &Overlap,
        holdings: &[Holding],
    ) -> Option<ConsolidationPlan> {
        let tickers = &overlap.tickers;
        let (keep, sell, basis) = match self
            .preferred(overlap, holdings)
            .filter(|(_, sell, _)| !sell.is_empty())
        {
            Some(selection) => selection,
            None => {
                let first = tickers.first()?;
                let sell = others(tickers, first);
                if sell.is_empty() {
                    return None;
                }
                (first, sell, KeepBasis::FirstListed)
            }
        };

        let moved: f64 = sell.iter().map(|t| t.weight).sum();
        let savings = (basis == KeepBasis::LowestFee).then(|| self.savings(keep, &sell));
        let reason = keep_reason(overlap.kind, basis, &keep.ticker, self.fees.known(&keep.ticker));

        let mut actions: Vec<RebalanceAction> = sell
            .iter()
            .map(|t| RebalanceAction::sell_all(t.ticker.clone(), t.weight))
            .collect();
        actions.push(RebalanceAction::add_to(keep.ticker.clone(), moved));

        Some(ConsolidationPlan {
            suggestion: ConsolidationSuggestion {
                category: label.to_string(),
                keep: keep.ticker.clone(),
                sell: sell.iter().map(|t| t.ticker.clone()).collect(),
                reason,
                savings,
            },
            actions,
        })
    }

    fn preferred<'a>(
        &self,
        overlap: &'a Overlap,
        holdings: &[Holding],
    ) -> Option<(&'a TickerWeight, Vec<&'a TickerWeight>, KeepBasis)> {
        let by_ticker: HashMap<&str, &Holding> =
            holdings.iter().map(|h| (h.ticker.as_str(), h)).collect();
        let lookup = |t: &TickerWeight| by_ticker.get(t.ticker.as_str()).copied();
        let tickers = &overlap.tickers;
        let matching = |pred: fn(&Holding) -> bool| {
            tickers
                .iter()
                .filter(|t| lookup(*t).is_some_and(pred))
                .collect::<Vec<_>>()
        };

        let selection = match overlap.kind {
            OverlapKind::Duplication(category) if Self::is_fee_sensitive(category) => {
                let keep = self.lowest_fee(tickers)?;
                (keep, others(tickers, keep), KeepBasis::LowestFee)
            }
            OverlapKind::Duplication(category) => {
                let (keep, basis) = match self.flagship(category, tickers) {
                    Some(keep) => (keep, KeepBasis::Flagship),
                    None => (tickers.first()?, KeepBasis::FirstListed),
                };
                (keep, others(tickers, keep), basis)
            }
            OverlapKind::BondOverlap => {
                let keep = self.flagship(Category::BondGlobal, tickers).or_else(|| {
                    matching(|h| h.has_category(Category::BondGlobal))
                        .first()
                        .copied()
                })?;
                let sell: Vec<_> = matching(|h| h.has_category(Category::BondAggregateUs))
                    .into_iter()
                    .filter(|t| t.ticker != keep.ticker)
                    .collect();
                (keep, sell, KeepBasis::Structural)
            }
            OverlapKind::SectorCluster(_) => {
                let keep = *matching(|h| h.sector_etf().is_some()).first()?;
                let sell = matching(Holding::is_individual_stock);
                (keep, sell, KeepBasis::Structural)
            }
            OverlapKind::FactorOverlap => {
                let keep = self
                    .flagship(Category::DividendFactor, tickers)
                    .or_else(|| {
                        matching(|h| h.has_category(Category::DividendFactor))
                            .first()
                            .copied()
                    })?;
                let sell = matching(|h| {
                    h.has_category(Category::QualityFactor)
                        && !h.has_category(Category::DividendFactor)
                });
                (keep, sell, KeepBasis::Structural)
            }
            OverlapKind::HiddenOverlap => {
                let keep = *matching(|h| {
                    h.has_category(Category::BroadMarket) || h.has_category(Category::Sp500Index)
                })
                .first()?;
                let sell = matching(|h| h.sector_etf().is_some());
                (keep, sell, KeepBasis::Structural)
            }
        };
        Some(selection)
    }

    fn lowest_fee<'a>(&self, tickers: &'a [TickerWeight]) -> Option<&'a TickerWeight> {
        // ties keep the earlier ticker
        tickers.iter().fold(None, |best: Option<&TickerWeight>, t| match best {
            Some(b) if self.fees.expense_ratio(&b.ticker) <= self.fees.expense_ratio(&t.ticker) => {
                Some(b)
            }
            _ => Some(t),
        })
    }

    fn flagship<'a>(&self, category: Category, tickers: &'a [TickerWeight]) -> Option<&'a TickerWeight> {
        self.flagships.get(&category)?.iter().find_map(|preferred| {
            tickers.iter().find(|t| t.ticker == *preferred)
        })
    }

    fn savings(&self, keep: &TickerWeight, sell: &[&TickerWeight]) -> f64 {
        let keep_fee = self.fees.expense_ratio(&keep.ticker);
        let savings: f64 = sell
            .iter()
            .map(|t| (self.fees.expense_ratio(&t.ticker) - keep_fee) * t.weight / 100.0)
            .sum();
        savings.max(0.0)
    }
}

fn others<'a>(tickers: &'a [TickerWeight], keep: &TickerWeight) -> Vec<&'a TickerWeight> {
    tickers.iter().filter(|t| t.ticker != keep.ticker).collect()
}

fn keep_reason(kind: OverlapKind, basis: KeepBasis, keep: &str, fee: Option<f64>) -> String {
    match basis {
        KeepBasis::LowestFee => match fee {
            Some(fee) => format!("{keep} has the lowest expense ratio ({fee:.3}%) of the group."),
            None => format!("{keep} has the lowest expense ratio of the group."),
        },
        KeepBasis::Flagship => {
            format!("{keep} is the most widely held, liquid fund in this category.")
        }
        KeepBasis::FirstListed => format!(
            "These funds are interchangeable; consolidate into one, such as {keep}."
        ),
        KeepBasis::Structural => match kind {
            OverlapKind::BondOverlap => format!(
                "{keep} already includes U.S. bonds alongside international bonds."
            ),
            OverlapKind::SectorCluster(sector) => format!(
                "{keep} already holds these {} companies with less single-stock risk.",
                sector.label()
            ),
            OverlapKind::FactorOverlap => format!(
                "{keep} captures most of the quality tilt while paying dividends."
            ),
            OverlapKind::HiddenOverlap => {
                format!("{keep} already owns every sector the sector ETFs cover.")
            }
            OverlapKind::Duplication(_) => format!("Consolidate into {keep}."),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::parser::parse_holdings;
    use crate::redundancy::detect_overlaps;
    use crate::recommend::TradeAction;
    use crate::types::Sector;
    use approx::assert_relative_eq;

    fn plans(text: &str) -> Vec<ConsolidationPlan> {
        let holdings = Classifier::standard().classify_all(&parse_holdings(text).unwrap());
        let policy = KeepPolicy::default();
        detect_overlaps(&holdings)
            .iter()
            .filter_map(|o| policy.consolidate("test", o, &holdings))
            .collect()
    }

    #[test]
    fn test_lowest_fee_keep() {
        let plans = plans("FZROX 40%, VTI 30%, BND 30%");
        assert_eq!(plans.len(), 1);
        let s = &plans[0].suggestion;
        assert_eq!(s.keep, "FZROX");
        assert_eq!(s.sell, ["VTI"]);
        assert_relative_eq!(s.savings.unwrap(), 0.009, epsilon = 1e-12);

        let actions = &plans[0].actions;
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, TradeAction::Sell);
        assert_relative_eq!(actions[0].percentage, -30.0);
        assert_eq!(actions[1].ticker, "FZROX");
        assert_relative_eq!(actions[1].percentage, 30.0);
    }

    #[test]
    fn test_fee_tie_keeps_first_seen() {
        let plans = plans("ITOT 30%, VTI 30%");
        assert_eq!(plans[0].suggestion.keep, "ITOT");
        assert_relative_eq!(plans[0].suggestion.savings.unwrap(), 0.0);
    }

    #[test]
    fn test_flagship_keep() {
        let plans = plans("FBND 20%, AGG 20%, BND 20%");
        let s = &plans[0].suggestion;
        assert_eq!(s.keep, "BND");
        assert_eq!(s.sell, ["FBND", "AGG"]);
        assert!(s.savings.is_none());
    }

    #[test]
    fn test_first_listed_fallback() {
        let plans = plans("VBTLX 20%, IUSB 20%");
        assert_eq!(plans[0].suggestion.keep, "VBTLX");
        assert!(plans[0].suggestion.reason.contains("interchangeable"));
    }

    #[test]
    fn test_structural_keeps() {
        let plans = plans("BND 20%, BNDW 20%");
        assert_eq!(plans[0].suggestion.keep, "BNDW");
        assert_eq!(plans[0].suggestion.sell, ["BND"]);

        let plans = self::plans("XLK 20%, AAPL 15%, MSFT 10%");
        assert_eq!(plans[0].suggestion.keep, "XLK");
        assert_eq!(plans[0].suggestion.sell, ["AAPL", "MSFT"]);
        assert_relative_eq!(plans[0].actions[2].percentage, 25.0);

        let plans = self::plans("QUAL 20%, SCHD 20%");
        assert_eq!(plans[0].suggestion.keep, "SCHD");
        assert_eq!(plans[0].suggestion.sell, ["QUAL"]);
    }

    #[test]
    fn test_structural_miss_keeps_first_listed() {
        let holdings = vec![
            Holding::new("AAPL", 20.0).with_category(Category::IndividualStock),
            Holding::new("MSFT", 10.0).with_category(Category::IndividualStock),
        ];
        let tickers = holdings
            .iter()
            .map(|h| TickerWeight::new(h.ticker.clone(), h.weight))
            .collect();
        let overlap = Overlap::new(OverlapKind::SectorCluster(Sector::Technology), tickers);

        let plan = KeepPolicy::default()
            .consolidate("Technology", &overlap, &holdings)
            .unwrap();
        assert_eq!(plan.suggestion.keep, "AAPL");
        assert_eq!(plan.suggestion.sell, ["MSFT"]);
        assert!(plan.suggestion.reason.contains("interchangeable"));
        assert_relative_eq!(plan.actions[1].percentage, 10.0);

        let single = Overlap::new(OverlapKind::BondOverlap, vec![TickerWeight::new("BND", 50.0)]);
        assert!(KeepPolicy::default()
            .consolidate("Bonds", &single, &holdings)
            .is_none());
    }
}
