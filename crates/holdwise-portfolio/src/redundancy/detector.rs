//! Overlap detection and redundancy findings.

use super::rules::{
    BondOverlapRule, CategoryDuplicationRule, FactorOverlapRule, HiddenOverlapRule, OverlapRule,
    SectorClusterRule,
};
use super::{Overlap, OverlapKind};
use crate::types::{Category, Holding, TickerWeight};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// OVERLAP DETECTOR
// =============================================================================

/// Ordered table of overlap rules.
#[derive(Debug, Default)]
pub struct OverlapDetector {
    rules: Vec<Box<dyn OverlapRule>>,
}

impl OverlapDetector {
    /// Creates a detector with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rule table: duplication, bond overlap, sector clusters,
    /// factor overlap, hidden overlap.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_rule(CategoryDuplicationRule::default())
            .with_rule(BondOverlapRule)
            .with_rule(SectorClusterRule::default())
            .with_rule(FactorOverlapRule)
            .with_rule(HiddenOverlapRule::default())
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl OverlapRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Runs every rule in order and concatenates their overlaps.
    ///
    /// An overlap needs at least two holdings; a single fund that a custom
    /// registry files under two related categories is not reported.
    #[must_use]
    pub fn detect(&self, holdings: &[Holding]) -> Vec<Overlap> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let overlaps = rule.evaluate(holdings);
                debug!(rule = rule.name(), found = overlaps.len(), "overlap rule evaluated");
                overlaps
            })
            .filter(|overlap| overlap.tickers.len() >= 2)
            .collect()
    }
}

/// Runs the standard overlap rules once.
///
/// Both the [`RedundancyDetector`] and the simplification scorer consume this
/// output.
#[must_use]
pub fn detect_overlaps(holdings: &[Holding]) -> Vec<Overlap> {
    OverlapDetector::standard().detect(holdings)
}

// =============================================================================
// FINDINGS
// =============================================================================

/// A user-facing redundancy finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedundancyFinding {
    /// Machine-readable overlap kind.
    pub kind: OverlapKind,
    /// Human label for the overlapping exposure.
    pub category: String,
    /// Involved holdings, in input order.
    pub tickers: Vec<TickerWeight>,
    /// Why these holdings overlap.
    pub reason: String,
    /// Sum of the involved weights.
    pub combined_weight: f64,
}

impl RedundancyFinding {
    /// Builds the finding for an overlap using the fixed label and reason tables.
    #[must_use]
    pub fn from_overlap(overlap: &Overlap) -> Self {
        Self {
            kind: overlap.kind,
            category: finding_label(overlap.kind),
            tickers: overlap.tickers.clone(),
            reason: finding_reason(overlap.kind).to_string(),
            combined_weight: overlap.combined_weight(),
        }
    }

    /// Tickers involved, in order.
    pub fn ticker_names(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|t| t.ticker.as_str())
    }
}

/// Result of redundancy detection.
///
/// An explicit sentinel distinguishes "checked, nothing found" from an
/// empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum RedundancyOutcome {
    /// No overlapping exposure.
    #[default]
    NoneDetected,
    /// One or more findings, in rule order.
    Detected(Vec<RedundancyFinding>),
}

impl RedundancyOutcome {
    /// Findings, empty when none were detected.
    #[must_use]
    pub fn findings(&self) -> &[RedundancyFinding] {
        match self {
            Self::NoneDetected => &[],
            Self::Detected(findings) => findings,
        }
    }

    /// Returns true for the `NoneDetected` sentinel.
    #[must_use]
    pub fn is_none_detected(&self) -> bool {
        matches!(self, Self::NoneDetected)
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings().len()
    }

    /// Returns true if there are no findings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings().is_empty()
    }
}

impl From<Vec<RedundancyFinding>> for RedundancyOutcome {
    fn from(findings: Vec<RedundancyFinding>) -> Self {
        if findings.is_empty() {
            Self::NoneDetected
        } else {
            Self::Detected(findings)
        }
    }
}

/// Turns overlaps into labeled findings.
#[derive(Debug, Default)]
pub struct RedundancyDetector {
    overlaps: OverlapDetector,
}

impl RedundancyDetector {
    /// Detector over the standard rule table.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_detector(OverlapDetector::standard())
    }

    /// Detector over a custom rule table.
    #[must_use]
    pub fn with_detector(overlaps: OverlapDetector) -> Self {
        Self { overlaps }
    }

    /// Detects redundant exposure in `holdings`.
    #[must_use]
    pub fn detect(&self, holdings: &[Holding]) -> RedundancyOutcome {
        Self::findings(&self.overlaps.detect(holdings))
    }

    /// Labels an already-computed overlap list.
    #[must_use]
    pub fn findings(overlaps: &[Overlap]) -> RedundancyOutcome {
        overlaps
            .iter()
            .map(RedundancyFinding::from_overlap)
            .collect::<Vec<_>>()
            .into()
    }
}

fn finding_label(kind: OverlapKind) -> String {
    match kind {
        OverlapKind::Duplication(category) => category.label(),
        OverlapKind::BondOverlap => "U.S. & Global Bond Funds".to_string(),
        OverlapKind::SectorCluster(sector) => format!("{} Concentration", sector.label()),
        OverlapKind::FactorOverlap => "Dividend & Quality Factor Funds".to_string(),
        OverlapKind::HiddenOverlap => "Broad Index + Sector ETFs".to_string(),
    }
}

fn finding_reason(kind: OverlapKind) -> &'static str {
    match kind {
        OverlapKind::Duplication(category) => match category {
            Category::BroadMarket => {
                "These funds all track the total U.S. stock market; owning more than one adds no diversification."
            }
            Category::Sp500Index => {
                "These funds track the same S&P 500 index and hold identical stocks."
            }
            Category::Nasdaq100Index => {
                "These funds track the same Nasdaq-100 index and hold identical stocks."
            }
            Category::BondAggregateUs => {
                "These funds track the U.S. investment-grade bond market and hold largely the same bonds."
            }
            Category::InternationalEquity => {
                "These funds hold overlapping baskets of non-U.S. stocks."
            }
            Category::DividendFactor => {
                "Dividend funds screen for many of the same high-yield companies."
            }
            Category::Gold => "These funds all hold physical gold; they are interchangeable.",
            Category::RealEstate => "These funds hold largely the same U.S. REITs.",
            Category::TreasuryShort => {
                "These funds hold the same short-term U.S. Treasury bills."
            }
            Category::Tips => "These funds hold the same inflation-protected Treasuries.",
            _ => "These holdings provide the same market exposure.",
        },
        OverlapKind::BondOverlap => {
            "Global bond funds already include a large U.S. bond allocation, duplicating the U.S. aggregate fund."
        }
        OverlapKind::SectorCluster(_) => {
            "The sector ETF already owns these companies; the individual stocks stack extra weight on the same names."
        }
        OverlapKind::FactorOverlap => {
            "Dividend and quality screens select many of the same large, profitable companies."
        }
        OverlapKind::HiddenOverlap => {
            "A broad index fund already owns every sector; the sector ETFs re-buy the same stocks at higher fees."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::parser::parse_holdings;
    use approx::assert_relative_eq;

    fn holdings(text: &str) -> Vec<Holding> {
        Classifier::standard().classify_all(&parse_holdings(text).unwrap())
    }

    #[test]
    fn test_standard_rule_order() {
        let names: Vec<_> = OverlapDetector::standard().rule_names().collect();
        assert_eq!(
            names,
            [
                "category-duplication",
                "bond-overlap",
                "sector-cluster",
                "factor-overlap",
                "hidden-overlap"
            ]
        );
    }

    #[test]
    fn test_broad_market_duplication() {
        let outcome = RedundancyDetector::standard().detect(&holdings("FZROX 40%, VTI 30%, BND 30%"));
        assert_eq!(outcome.len(), 1);

        let finding = &outcome.findings()[0];
        assert_eq!(finding.kind, OverlapKind::Duplication(Category::BroadMarket));
        assert_eq!(finding.category, "Broad Market Index Funds");
        assert_eq!(finding.ticker_names().collect::<Vec<_>>(), ["FZROX", "VTI"]);
        assert_relative_eq!(finding.combined_weight, 70.0);
    }

    #[test]
    fn test_none_detected_sentinel() {
        let outcome = RedundancyDetector::standard().detect(&holdings("SGOV 50%, VTI 50%"));
        assert!(outcome.is_none_detected());
        assert!(outcome.findings().is_empty());

        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"status":"none_detected"}"#);
    }

    #[test]
    fn test_multiple_findings_in_rule_order() {
        let outcome = RedundancyDetector::standard()
            .detect(&holdings("VOO 30%, XLK 10%, XLV 10%, XLF 10%, JPM 5%, BND 20%, BNDX 15%"));
        let kinds: Vec<_> = outcome.findings().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            [
                OverlapKind::BondOverlap,
                OverlapKind::SectorCluster(crate::types::Sector::Finance),
                OverlapKind::HiddenOverlap,
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let h = holdings("FZROX 40%, VTI 30%, BND 20%, AGG 10%");
        let detector = RedundancyDetector::standard();
        assert_eq!(detector.detect(&h), detector.detect(&h));
    }
}
