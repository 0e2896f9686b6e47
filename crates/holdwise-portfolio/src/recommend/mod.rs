//! Consolidation and rebalancing recommendations.
//!
//! The [`Recommender`] turns redundancy findings and exposure measures into a
//! short, prioritized list of [`Recommendation`]s. Priority order:
//!
//! 1. Index duplication
//! 2. Bond duplication and overlap
//! 3. Sector clustering (including a broad index beside sector ETFs)
//! 4. Low bond allocation for retirement profiles
//! 5. International allocation outside its band
//! 6. Factor overlap
//! 7. Single-stock concentration
//! 8. Other fund duplication (gold, REITs)

mod consolidation;
mod fees;
mod rebalance;

pub use consolidation::{ConsolidationPlan, ConsolidationSuggestion, KeepPolicy};
pub use fees::FeeSchedule;
pub use rebalance::{net_change, RebalanceAction, TradeAction};

use crate::redundancy::{Overlap, OverlapKind, RedundancyFinding, RedundancyOutcome};
use crate::scoring::ExposureSummary;
use crate::types::{AnalyzerConfig, Category, Holding, InvestorProfile, RecommendationPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Priority class of a recommendation. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Duplicate broad-market, S&P 500, Nasdaq-100 or international funds.
    IndexDuplication,
    /// Duplicate or overlapping bond funds.
    BondDuplication,
    /// Sector ETF clusters or sector ETFs beside a broad index.
    SectorConcentration,
    /// Bond sleeve too small for a retirement profile.
    LowBondAllocation,
    /// International equity outside the target band.
    InternationalMisalignment,
    /// Overlapping factor funds.
    FactorOverlap,
    /// A single stock above the concentration limit.
    SingleStockConcentration,
    /// Duplicate niche funds (gold, REITs).
    FundDuplication,
}

impl RecommendationKind {
    /// Priority class for an overlap kind.
    #[must_use]
    pub fn for_overlap(kind: OverlapKind) -> Self {
        match kind {
            OverlapKind::Duplication(category) => match category {
                Category::BroadMarket
                | Category::Sp500Index
                | Category::Nasdaq100Index
                | Category::InternationalEquity => Self::IndexDuplication,
                Category::BondAggregateUs
                | Category::BondGlobal
                | Category::TreasuryShort
                | Category::Tips => Self::BondDuplication,
                Category::DividendFactor | Category::QualityFactor => Self::FactorOverlap,
                _ => Self::FundDuplication,
            },
            OverlapKind::BondOverlap => Self::BondDuplication,
            OverlapKind::SectorCluster(_) | OverlapKind::HiddenOverlap => {
                Self::SectorConcentration
            }
            OverlapKind::FactorOverlap => Self::FactorOverlap,
        }
    }
}

/// One actionable recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Priority class.
    pub kind: RecommendationKind,
    /// Short title.
    pub title: String,
    /// Why the change helps.
    pub rationale: String,
    /// Consolidation details, for overlap-driven recommendations.
    pub consolidation: Option<ConsolidationSuggestion>,
    /// Trades that implement the recommendation.
    pub actions: Vec<RebalanceAction>,
}

/// Builds prioritized recommendations.
#[derive(Debug, Clone)]
pub struct Recommender {
    keep: KeepPolicy,
    policy: RecommendationPolicy,
    profile: InvestorProfile,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl Recommender {
    /// Creates a recommender from the analyzer configuration.
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let fees = FeeSchedule::standard()
            .with_fallback(config.recommendations.fallback_expense_ratio);
        Self {
            keep: KeepPolicy::new(fees),
            policy: config.recommendations.clone(),
            profile: config.profile,
        }
    }

    /// Replaces the keep policy (e.g. to supply a custom fee table).
    #[must_use]
    pub fn with_keep_policy(mut self, keep: KeepPolicy) -> Self {
        self.keep = keep;
        self
    }

    /// Produces at most `max_recommendations` recommendations, highest priority first.
    #[must_use]
    pub fn recommend(
        &self,
        redundancy: &RedundancyOutcome,
        holdings: &[Holding],
        exposures: &ExposureSummary,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = redundancy
            .findings()
            .iter()
            .filter_map(|finding| self.from_finding(finding, holdings))
            .collect();

        recommendations.extend(self.low_bond_allocation(exposures));
        recommendations.extend(self.international_band(holdings, exposures));
        recommendations.extend(self.single_stock_concentration(holdings));

        // stable: equal kinds keep finding order
        recommendations.sort_by_key(|r| r.kind);
        if recommendations.len() > self.policy.max_recommendations {
            debug!(
                total = recommendations.len(),
                cap = self.policy.max_recommendations,
                "recommendations capped"
            );
            recommendations.truncate(self.policy.max_recommendations);
        }
        recommendations
    }

    fn from_finding(&self, finding: &RedundancyFinding, holdings: &[Holding]) -> Option<Recommendation> {
        let overlap = Overlap::new(finding.kind, finding.tickers.clone());
        let plan = self.keep.consolidate(&finding.category, &overlap, holdings)?;
        let title = match finding.kind {
            OverlapKind::SectorCluster(sector) => {
                format!("Reduce {} concentration", sector.label())
            }
            OverlapKind::HiddenOverlap => "Drop sector ETFs covered by your index fund".to_string(),
            _ => format!("Consolidate {}", finding.category),
        };

        Some(Recommendation {
            kind: RecommendationKind::for_overlap(finding.kind),
            title,
            rationale: finding.reason.clone(),
            consolidation: Some(plan.suggestion),
            actions: plan.actions,
        })
    }

    fn low_bond_allocation(&self, exposures: &ExposureSummary) -> Option<Recommendation> {
        let bonds = exposures.bonds_concentration;
        if self.profile != InvestorProfile::Retirement || bonds >= self.policy.min_retirement_bonds {
            return None;
        }

        let target = self.policy.retirement_bond_target;
        let delta = target - bonds;
        Some(Recommendation {
            kind: RecommendationKind::LowBondAllocation,
            title: "Add a bond allocation".to_string(),
            rationale: format!(
                "Bonds are {bonds:.1}% of the portfolio; a retirement portfolio usually holds at least {:.0}% to cushion stock declines.",
                self.policy.min_retirement_bonds
            ),
            consolidation: None,
            actions: vec![RebalanceAction::buy(
                self.policy.retirement_bond_ticker.clone(),
                delta,
                format!("Raise bonds from {bonds:.1}% to {target:.1}%"),
            )],
        })
    }

    fn international_band(
        &self,
        holdings: &[Holding],
        exposures: &ExposureSummary,
    ) -> Option<Recommendation> {
        if exposures.equity_weight <= 0.0 {
            return None;
        }

        let intl = exposures.international_weight;
        let (min, max) = (self.policy.international_min, self.policy.international_max);

        if intl < min {
            let delta = min - intl;
            return Some(Recommendation {
                kind: RecommendationKind::InternationalMisalignment,
                title: "Add international exposure".to_string(),
                rationale: format!(
                    "International stocks are {intl:.1}% of the portfolio, below the {min:.0}-{max:.0}% range that spreads risk across economies."
                ),
                consolidation: None,
                actions: vec![RebalanceAction::buy(
                    self.policy.international_ticker.clone(),
                    delta,
                    format!("Raise international from {intl:.1}% to {min:.1}%"),
                )],
            });
        }

        if intl > max {
            let excess = intl - max;
            let actions = holdings
                .iter()
                .filter(|h| h.has_category(Category::InternationalEquity))
                .map(|h| {
                    let trim = excess * h.weight / intl;
                    RebalanceAction::sell(h.ticker.clone(), trim, format!("Trim {trim:.1}%"))
                })
                .collect();
            return Some(Recommendation {
                kind: RecommendationKind::InternationalMisalignment,
                title: "Reduce international exposure".to_string(),
                rationale: format!(
                    "International stocks are {intl:.1}% of the portfolio, above the {min:.0}-{max:.0}% range."
                ),
                consolidation: None,
                actions,
            });
        }

        None
    }

    fn single_stock_concentration(&self, holdings: &[Holding]) -> Option<Recommendation> {
        let limit = self.policy.single_stock_limit;
        let actions: Vec<RebalanceAction> = holdings
            .iter()
            .filter(|h| h.is_individual_stock() && h.weight > limit)
            .map(|h| {
                RebalanceAction::sell(
                    h.ticker.clone(),
                    h.weight - limit,
                    format!("Trim from {:.1}% to {limit:.1}%", h.weight),
                )
            })
            .collect();

        if actions.is_empty() {
            return None;
        }

        let tickers: Vec<&str> = actions.iter().map(|a| a.ticker.as_str()).collect();
        Some(Recommendation {
            kind: RecommendationKind::SingleStockConcentration,
            title: "Trim concentrated stock positions".to_string(),
            rationale: format!(
                "{} each exceed {limit:.0}% of the portfolio; a single company's setback would hit the whole portfolio.",
                tickers.join(", ")
            ),
            consolidation: None,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::parser::parse_holdings;
    use crate::redundancy::RedundancyDetector;
    use approx::assert_relative_eq;

    fn recommend_with(text: &str, config: &AnalyzerConfig) -> Vec<Recommendation> {
        let holdings = Classifier::standard().classify_all(&parse_holdings(text).unwrap());
        let outcome = RedundancyDetector::standard().detect(&holdings);
        let exposures = ExposureSummary::from_holdings(&holdings);
        Recommender::from_config(config).recommend(&outcome, &holdings, &exposures)
    }

    fn recommend(text: &str) -> Vec<Recommendation> {
        recommend_with(text, &AnalyzerConfig::default())
    }

    #[test]
    fn test_priority_order() {
        let recs = recommend("QUAL 10%, SCHD 10%, XLK 10%, AAPL 5%, BND 10%, AGG 10%, FZROX 20%, VTI 15%, VXUS 10%");
        let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                RecommendationKind::IndexDuplication,
                RecommendationKind::BondDuplication,
                RecommendationKind::SectorConcentration,
                RecommendationKind::FactorOverlap,
            ]
        );
    }

    #[test]
    fn test_cap() {
        let config = AnalyzerConfig::new().with_max_recommendations(2);
        let recs = recommend_with("FZROX 30%, VTI 30%, BND 10%, AGG 10%, XLK 10%, AAPL 10%", &config);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].kind, RecommendationKind::BondDuplication);
    }

    #[test]
    fn test_low_bond_for_retirement_only() {
        let text = "VTI 80%, VXUS 15%, BND 5%";
        assert!(recommend(text)
            .iter()
            .all(|r| r.kind != RecommendationKind::LowBondAllocation));

        let config = AnalyzerConfig::new().with_profile(InvestorProfile::Retirement);
        let recs = recommend_with(text, &config);
        let rec = recs
            .iter()
            .find(|r| r.kind == RecommendationKind::LowBondAllocation)
            .unwrap();
        assert_eq!(rec.actions[0].ticker, "BND");
        assert_relative_eq!(rec.actions[0].percentage, 25.0);
    }

    #[test]
    fn test_international_band() {
        let recs = recommend("VTI 100%");
        let rec = recs
            .iter()
            .find(|r| r.kind == RecommendationKind::InternationalMisalignment)
            .unwrap();
        assert_eq!(rec.actions[0].action, TradeAction::Buy);
        assert_relative_eq!(rec.actions[0].percentage, 10.0);

        let recs = recommend("VTI 40%, VXUS 60%");
        let rec = recs
            .iter()
            .find(|r| r.kind == RecommendationKind::InternationalMisalignment)
            .unwrap();
        assert_relative_eq!(rec.actions[0].percentage, -20.0);

        assert!(recommend("SGOV 100%")
            .iter()
            .all(|r| r.kind != RecommendationKind::InternationalMisalignment));
    }

    #[test]
    fn test_single_stock_concentration() {
        let recs = recommend("VTI 60%, VXUS 15%, NVDA 25%");
        let rec = recs
            .iter()
            .find(|r| r.kind == RecommendationKind::SingleStockConcentration)
            .unwrap();
        assert_eq!(rec.actions.len(), 1);
        assert_relative_eq!(rec.actions[0].percentage, -15.0);
    }

    #[test]
    fn test_sells_are_negative() {
        for rec in recommend("FZROX 40%, VTI 30%, BND 30%") {
            for action in rec.actions {
                match action.action {
                    TradeAction::Sell => assert!(action.percentage < 0.0),
                    TradeAction::Buy => assert!(action.percentage > 0.0),
                }
            }
        }
    }
}
