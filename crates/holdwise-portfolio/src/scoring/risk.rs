//! Risk dimension scoring.
//!
//! Scores come from static category membership and allocation percentages,
//! not from price history. Three dimensions are computed from exposure
//! concentration (structure, correlation, volatility); the remaining two are
//! fixed baselines until a signal source exists for them.

use crate::types::{AnalyzerConfig, Category, Holding, RiskThresholds, Sector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Baseline score reported for the signal-quality dimension.
pub const SIGNAL_QUALITY_BASELINE: u8 = 5;

/// Baseline score reported for the narrative-drift dimension.
pub const NARRATIVE_DRIFT_BASELINE: u8 = 4;

/// A scored risk dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskDimension {
    /// Portfolio construction: holding count and sector spread.
    Structure,
    /// How much holdings move together.
    Correlation,
    /// Expected price swings.
    Volatility,
    /// Quality of the information behind the allocation (baseline).
    SignalQuality,
    /// Drift between stated goals and holdings (baseline).
    NarrativeDrift,
}

impl RiskDimension {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Correlation => "Correlation",
            Self::Volatility => "Volatility",
            Self::SignalQuality => "Signal Quality",
            Self::NarrativeDrift => "Narrative Drift",
        }
    }
}

impl fmt::Display for RiskDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Risk band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score 0-3.
    #[serde(rename = "Low risk")]
    Low,
    /// Score 4-6.
    #[serde(rename = "Moderate risk")]
    Moderate,
    /// Score 7-10.
    #[serde(rename = "High risk")]
    High,
}

impl RiskLevel {
    /// Maps a 0-10 score onto its band.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Self::Low,
            4..=6 => Self::Moderate,
            _ => Self::High,
        }
    }

    /// Human label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low risk",
            Self::Moderate => "Moderate risk",
            Self::High => "High risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dimension's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Which dimension.
    pub dimension: RiskDimension,
    /// Integer score in `[0, 10]`.
    pub score: u8,
    /// Band for the score.
    pub label: RiskLevel,
    /// True when the score is a fixed baseline, not computed.
    pub baseline: bool,
}

impl RiskScore {
    /// Creates a computed score.
    #[must_use]
    pub fn computed(dimension: RiskDimension, score: u8) -> Self {
        Self::build(dimension, score, false)
    }

    /// Creates a baseline score.
    #[must_use]
    pub fn baseline(dimension: RiskDimension, score: u8) -> Self {
        Self::build(dimension, score, true)
    }

    fn build(dimension: RiskDimension, score: u8, baseline: bool) -> Self {
        let score = score.min(10);
        Self {
            dimension,
            score,
            label: RiskLevel::from_score(score),
            baseline,
        }
    }
}

/// Aggregate exposure measures derived from holdings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExposureSummary {
    /// Weight with sector Technology.
    pub technology_concentration: f64,
    /// Weight in bond-like categories.
    pub bonds_concentration: f64,
    /// Weight in international equity.
    pub international_weight: f64,
    /// Weight in any equity category.
    pub equity_weight: f64,
    /// Weight in individual stocks.
    pub individual_stock_weight: f64,
    /// Sum of all weights (not normalized).
    pub total_weight: f64,
    /// Weight per sector label.
    pub sector_weights: BTreeMap<Sector, f64>,
}

impl ExposureSummary {
    /// Computes exposures for `holdings`.
    #[must_use]
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let mut summary = Self::default();
        for h in holdings {
            summary.total_weight += h.weight;
            *summary.sector_weights.entry(h.sector).or_insert(0.0) += h.weight;

            if h.sector == Sector::Technology {
                summary.technology_concentration += h.weight;
            }
            if h.is_bond() {
                summary.bonds_concentration += h.weight;
            }
            if h.has_category(Category::InternationalEquity) {
                summary.international_weight += h.weight;
            }
            if h.is_equity() {
                summary.equity_weight += h.weight;
            }
            if h.is_individual_stock() {
                summary.individual_stock_weight += h.weight;
            }
        }
        summary
    }

    /// Number of distinct sectors, ignoring `Other`.
    #[must_use]
    pub fn distinct_sectors(&self) -> usize {
        self.sector_weights
            .keys()
            .filter(|s| **s != Sector::Other)
            .count()
    }
}

/// All five risk scores plus the overall score and exposures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Structure score.
    pub structure: RiskScore,
    /// Correlation score.
    pub correlation: RiskScore,
    /// Volatility score.
    pub volatility: RiskScore,
    /// Signal-quality baseline.
    pub signal_quality: RiskScore,
    /// Narrative-drift baseline.
    pub narrative_drift: RiskScore,
    /// `round(mean(structure, correlation, volatility))`.
    pub overall_risk_score: u8,
    /// Band for the overall score.
    pub overall_label: RiskLevel,
    /// Exposure measures the scores were derived from.
    pub exposures: ExposureSummary,
}

impl RiskAssessment {
    /// All five scores in dimension order.
    #[must_use]
    pub fn scores(&self) -> [&RiskScore; 5] {
        [
            &self.structure,
            &self.correlation,
            &self.volatility,
            &self.signal_quality,
            &self.narrative_drift,
        ]
    }
}

/// Computes [`RiskAssessment`]s from classified holdings.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    thresholds: RiskThresholds,
    signal_quality_baseline: u8,
    narrative_drift_baseline: u8,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl RiskScorer {
    /// Creates a scorer from the analyzer configuration.
    #[must_use]
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            thresholds: config.risk.clone(),
            signal_quality_baseline: config.signal_quality_baseline,
            narrative_drift_baseline: config.narrative_drift_baseline,
        }
    }

    /// Scores `holdings`.
    #[must_use]
    pub fn score(&self, holdings: &[Holding]) -> RiskAssessment {
        let exposures = ExposureSummary::from_holdings(holdings);
        let t = &self.thresholds;
        let tech = exposures.technology_concentration;
        let bonds = exposures.bonds_concentration;
        let tech_heavy = tech > t.tech_concentration_high;
        let bond_heavy = bonds > t.bonds_concentration_low_risk;

        let diversified = holdings.len() >= t.diversified_min_holdings
            && exposures.distinct_sectors() >= t.diversified_min_sectors
            && tech < t.diversified_max_tech;

        let structure = if tech_heavy {
            7
        } else if diversified {
            3
        } else {
            5
        };
        let correlation = if tech_heavy {
            8
        } else if bond_heavy {
            3
        } else {
            5
        };
        let volatility = if tech_heavy {
            7
        } else if bond_heavy {
            3
        } else {
            4
        };

        let overall = overall_score(structure, correlation, volatility);

        RiskAssessment {
            structure: RiskScore::computed(RiskDimension::Structure, structure),
            correlation: RiskScore::computed(RiskDimension::Correlation, correlation),
            volatility: RiskScore::computed(RiskDimension::Volatility, volatility),
            signal_quality: RiskScore::baseline(
                RiskDimension::SignalQuality,
                self.signal_quality_baseline,
            ),
            narrative_drift: RiskScore::baseline(
                RiskDimension::NarrativeDrift,
                self.narrative_drift_baseline,
            ),
            overall_risk_score: overall,
            overall_label: RiskLevel::from_score(overall),
            exposures,
        }
    }
}

fn overall_score(structure: u8, correlation: u8, volatility: u8) -> u8 {
    let mean = f64::from(u16::from(structure) + u16::from(correlation) + u16::from(volatility)) / 3.0;
    mean.round() as u8
}
