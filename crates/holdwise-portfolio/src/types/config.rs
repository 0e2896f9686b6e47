//! Configuration for portfolio analysis.
//!
//! Every policy number the engine uses lives here so callers can tune the
//! scoring without forking the rules. Defaults reproduce the standard
//! behaviour exactly.

use crate::error::{PortfolioError, PortfolioResult};
use crate::scoring::{NARRATIVE_DRIFT_BASELINE, SIGNAL_QUALITY_BASELINE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Investor profile used by profile-sensitive recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestorProfile {
    /// Long horizon, equity-heavy.
    Growth,
    /// No particular tilt.
    #[default]
    Balanced,
    /// Near or in retirement; expects a bond sleeve.
    Retirement,
}

impl fmt::Display for InvestorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Growth => "growth",
            Self::Balanced => "balanced",
            Self::Retirement => "retirement",
        };
        f.write_str(name)
    }
}

impl FromStr for InvestorProfile {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "growth" => Ok(Self::Growth),
            "balanced" => Ok(Self::Balanced),
            "retirement" => Ok(Self::Retirement),
            other => Err(PortfolioError::invalid_config(format!(
                "unknown investor profile '{other}' (expected growth, balanced or retirement)"
            ))),
        }
    }
}

/// Cut-points used by the risk scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Technology weight above which structure/correlation/volatility go high.
    pub tech_concentration_high: f64,

    /// Bond weight above which correlation and volatility go low.
    pub bonds_concentration_low_risk: f64,

    /// Minimum holdings for a portfolio to count as diversified.
    pub diversified_min_holdings: usize,

    /// Minimum distinct sectors (excluding `Other`) to count as diversified.
    pub diversified_min_sectors: usize,

    /// Technology weight must stay below this to count as diversified.
    pub diversified_max_tech: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            tech_concentration_high: 40.0,
            bonds_concentration_low_risk: 30.0,
            diversified_min_holdings: 4,
            diversified_min_sectors: 3,
            diversified_max_tech: 50.0,
        }
    }
}

/// Points deducted from the simplification score per overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltySchedule {
    /// Broad-market or S&P 500 duplication (each).
    pub index_duplication: f64,
    /// U.S. aggregate bond duplication.
    pub bond_duplication: f64,
    /// U.S. aggregate plus global bond overlap.
    pub bond_overlap: f64,
    /// Each sector-ETF + stock cluster.
    pub sector_cluster: f64,
    /// Dividend fund duplication.
    pub dividend_duplication: f64,
    /// Dividend plus quality factor overlap.
    pub factor_overlap: f64,
    /// International equity duplication.
    pub international_duplication: f64,
    /// Gold, REIT or Nasdaq-100 duplication (each).
    pub niche_duplication: f64,
    /// Short treasury or TIPS duplication (each).
    pub cash_like_duplication: f64,
    /// Broad index held alongside three or more sector ETFs.
    pub hidden_overlap: f64,
    /// Holding count above `large_portfolio_count`.
    pub large_portfolio: f64,
    /// Holding count above `medium_portfolio_count` (and not large).
    pub medium_portfolio: f64,
    /// Holding count that triggers the large-portfolio penalty.
    pub large_portfolio_count: usize,
    /// Holding count that triggers the medium-portfolio penalty.
    pub medium_portfolio_count: usize,
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self {
            index_duplication: 2.0,
            bond_duplication: 1.5,
            bond_overlap: 1.0,
            sector_cluster: 1.5,
            dividend_duplication: 1.0,
            factor_overlap: 1.0,
            international_duplication: 1.5,
            niche_duplication: 1.0,
            cash_like_duplication: 0.5,
            hidden_overlap: 1.0,
            large_portfolio: 1.0,
            medium_portfolio: 0.5,
            large_portfolio_count: 20,
            medium_portfolio_count: 15,
        }
    }
}

impl PenaltySchedule {
    fn values(&self) -> [f64; 12] {
        [
            self.index_duplication,
            self.bond_duplication,
            self.bond_overlap,
            self.sector_cluster,
            self.dividend_duplication,
            self.factor_overlap,
            self.international_duplication,
            self.niche_duplication,
            self.cash_like_duplication,
            self.hidden_overlap,
            self.large_portfolio,
            self.medium_portfolio,
        ]
    }
}

/// Limits and targets used by the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Maximum number of recommendations emitted.
    pub max_recommendations: usize,

    /// Retirement profiles below this bond weight get a bond suggestion.
    pub min_retirement_bonds: f64,

    /// Bond weight a retirement portfolio is nudged toward.
    pub retirement_bond_target: f64,

    /// Ticker bought to raise the bond sleeve.
    pub retirement_bond_ticker: String,

    /// Lower edge of the international equity band.
    pub international_min: f64,

    /// Upper edge of the international equity band.
    pub international_max: f64,

    /// Ticker bought to raise international exposure.
    pub international_ticker: String,

    /// Single-stock weight above which concentration is flagged.
    pub single_stock_limit: f64,

    /// Expense ratio (percent) assumed for tickers missing from the fee table.
    pub fallback_expense_ratio: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            max_recommendations: 6,
            min_retirement_bonds: 20.0,
            retirement_bond_target: 30.0,
            retirement_bond_ticker: "BND".to_string(),
            international_min: 10.0,
            international_max: 40.0,
            international_ticker: "VXUS".to_string(),
            single_stock_limit: 10.0,
            fallback_expense_ratio: 0.10,
        }
    }
}

/// Configuration for [`PortfolioAnalyzer`](crate::PortfolioAnalyzer).
///
/// Deserializes from partial documents: missing fields take their defaults.
///
/// # Example
///
/// ```rust
/// use holdwise_portfolio::{AnalyzerConfig, InvestorProfile};
///
/// let config = AnalyzerConfig::new()
///     .with_profile(InvestorProfile::Retirement)
///     .with_max_recommendations(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Risk scorer cut-points.
    pub risk: RiskThresholds,

    /// Simplification penalties.
    pub penalties: PenaltySchedule,

    /// Recommender limits and targets.
    pub recommendations: RecommendationPolicy,

    /// Investor profile.
    pub profile: InvestorProfile,

    /// Baseline score reported for the signal-quality dimension.
    pub signal_quality_baseline: u8,

    /// Baseline score reported for the narrative-drift dimension.
    pub narrative_drift_baseline: u8,

    /// Enable parallel batch analysis (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum batch size to trigger parallel processing.
    pub parallel_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            risk: RiskThresholds::default(),
            penalties: PenaltySchedule::default(),
            recommendations: RecommendationPolicy::default(),
            profile: InvestorProfile::default(),
            signal_quality_baseline: SIGNAL_QUALITY_BASELINE,
            narrative_drift_baseline: NARRATIVE_DRIFT_BASELINE,
            parallel: true,
            parallel_threshold: 32,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the investor profile.
    #[must_use]
    pub fn with_profile(mut self, profile: InvestorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the risk thresholds.
    #[must_use]
    pub fn with_risk_thresholds(mut self, risk: RiskThresholds) -> Self {
        self.risk = risk;
        self
    }

    /// Sets the penalty schedule.
    #[must_use]
    pub fn with_penalties(mut self, penalties: PenaltySchedule) -> Self {
        self.penalties = penalties;
        self
    }

    /// Sets the recommendation policy.
    #[must_use]
    pub fn with_recommendation_policy(mut self, policy: RecommendationPolicy) -> Self {
        self.recommendations = policy;
        self
    }

    /// Sets the maximum number of recommendations.
    #[must_use]
    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.recommendations.max_recommendations = max;
        self
    }

    /// Overrides the baseline scores for the non-computed dimensions.
    #[must_use]
    pub fn with_baselines(mut self, signal_quality: u8, narrative_drift: u8) -> Self {
        self.signal_quality_baseline = signal_quality;
        self.narrative_drift_baseline = narrative_drift;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks the configuration for values the scorers cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> PortfolioResult<()> {
        let risk = &self.risk;
        for (name, value) in [
            ("risk.tech_concentration_high", risk.tech_concentration_high),
            (
                "risk.bonds_concentration_low_risk",
                risk.bonds_concentration_low_risk,
            ),
            ("risk.diversified_max_tech", risk.diversified_max_tech),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(PortfolioError::invalid_config(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        if self
            .penalties
            .values()
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
        {
            return Err(PortfolioError::invalid_config(
                "penalties must be non-negative",
            ));
        }
        if self.penalties.medium_portfolio_count > self.penalties.large_portfolio_count {
            return Err(PortfolioError::invalid_config(
                "penalties.medium_portfolio_count must not exceed large_portfolio_count",
            ));
        }

        let policy = &self.recommendations;
        if policy.max_recommendations == 0 {
            return Err(PortfolioError::invalid_config(
                "recommendations.max_recommendations must be positive",
            ));
        }
        if policy.international_min > policy.international_max {
            return Err(PortfolioError::invalid_config(format!(
                "international band is inverted: {} > {}",
                policy.international_min, policy.international_max
            )));
        }
        if policy.single_stock_limit <= 0.0 || policy.fallback_expense_ratio < 0.0 {
            return Err(PortfolioError::invalid_config(
                "single_stock_limit must be positive and fallback_expense_ratio non-negative",
            ));
        }

        if self.signal_quality_baseline > 10 || self.narrative_drift_baseline > 10 {
            return Err(PortfolioError::invalid_config(
                "baseline scores must be within 0..=10",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = AnalyzerConfig::default();
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 32);
        assert_eq!(config.profile, InvestorProfile::Balanced);
        assert_eq!(config.signal_quality_baseline, 5);
        assert_eq!(config.narrative_drift_baseline, 4);
        assert_eq!(config.recommendations.max_recommendations, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sequential() {
        let config = AnalyzerConfig::sequential();
        assert!(!config.parallel);
        assert!(!config.should_parallelize(1_000));
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalyzerConfig::new()
            .with_profile(InvestorProfile::Retirement)
            .with_max_recommendations(2)
            .with_baselines(6, 3)
            .with_threshold(8);

        assert_eq!(config.profile, InvestorProfile::Retirement);
        assert_eq!(config.recommendations.max_recommendations, 2);
        assert_eq!(config.signal_quality_baseline, 6);
        assert_eq!(config.narrative_drift_baseline, 3);
        assert_eq!(config.parallel_threshold, 8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AnalyzerConfig::new().with_max_recommendations(0);
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::new();
        config.penalties.sector_cluster = -1.0;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::new();
        config.risk.tech_concentration_high = 140.0;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::new();
        config.recommendations.international_min = 50.0;
        assert!(config.validate().is_err());

        let config = AnalyzerConfig::new().with_baselines(11, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: AnalyzerConfig = toml::from_str(
            r#"
            profile = "retirement"

            [risk]
            tech_concentration_high = 35.0

            [penalties]
            sector_cluster = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.profile, InvestorProfile::Retirement);
        assert_eq!(config.risk.tech_concentration_high, 35.0);
        assert_eq!(config.risk.bonds_concentration_low_risk, 30.0);
        assert_eq!(config.penalties.sector_cluster, 2.5);
        assert_eq!(config.penalties.index_duplication, 2.0);
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(
            "Retirement".parse::<InvestorProfile>().unwrap(),
            InvestorProfile::Retirement
        );
        assert!("yolo".parse::<InvestorProfile>().is_err());
        assert_eq!(InvestorProfile::Growth.to_string(), "growth");
    }
}
