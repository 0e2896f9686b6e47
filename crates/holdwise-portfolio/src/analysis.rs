//! End-to-end portfolio analysis.

use crate::classification::{CategoryRegistry, Classifier};
use crate::error::PortfolioResult;
use crate::parallel::maybe_parallel_map;
use crate::parser::{parse_holdings, ParseMetadata};
use crate::recommend::{ConsolidationSuggestion, KeepPolicy, RebalanceAction, Recommendation, Recommender};
use crate::redundancy::{OverlapDetector, RedundancyDetector, RedundancyOutcome};
use crate::scoring::{RiskAssessment, RiskScorer, SimplificationScore, SimplificationScorer};
use crate::types::{AnalyzerConfig, Holding};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Complete assessment of one submitted portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Classified holdings in input order.
    pub holdings: Vec<Holding>,
    /// Redundancy findings or the `NoneDetected` sentinel.
    pub redundancy: RedundancyOutcome,
    /// Risk scores and exposures.
    pub risk: RiskAssessment,
    /// Simplification score.
    pub simplification: SimplificationScore,
    /// Consolidation suggestions from the kept recommendations.
    pub consolidations: Vec<ConsolidationSuggestion>,
    /// All trades from the kept recommendations, in priority order.
    pub rebalance_actions: Vec<RebalanceAction>,
    /// Prioritized recommendations.
    pub recommendations: Vec<Recommendation>,
    /// How the holdings were parsed.
    pub parse: ParseMetadata,
}

/// Runs parse, classify, detect, score and recommend.
///
/// The analyzer holds only immutable tables, so one instance can be shared
/// across threads.
#[derive(Debug)]
pub struct PortfolioAnalyzer {
    config: AnalyzerConfig,
    classifier: Classifier,
    overlaps: OverlapDetector,
    risk: RiskScorer,
    simplification: SimplificationScorer,
    recommender: Recommender,
}

impl Default for PortfolioAnalyzer {
    fn default() -> Self {
        Self::from_valid_config(AnalyzerConfig::default())
    }
}

impl PortfolioAnalyzer {
    /// Creates an analyzer with the standard tables.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::InvalidConfig`](crate::PortfolioError::InvalidConfig)
    /// if `config` fails validation.
    pub fn new(config: AnalyzerConfig) -> PortfolioResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AnalyzerConfig) -> Self {
        Self {
            classifier: Classifier::standard(),
            overlaps: OverlapDetector::standard(),
            risk: RiskScorer::from_config(&config),
            simplification: SimplificationScorer::new(config.penalties.clone()),
            recommender: Recommender::from_config(&config),
            config,
        }
    }

    /// Replaces the category registry.
    #[must_use]
    pub fn with_registry(mut self, registry: CategoryRegistry) -> Self {
        self.classifier = Classifier::new(registry);
        self
    }

    /// Replaces the overlap rule table.
    #[must_use]
    pub fn with_overlap_detector(mut self, overlaps: OverlapDetector) -> Self {
        self.overlaps = overlaps;
        self
    }

    /// Replaces the keep policy used for consolidations.
    #[must_use]
    pub fn with_keep_policy(mut self, keep: KeepPolicy) -> Self {
        self.recommender = self.recommender.with_keep_policy(keep);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Analyzes free-form holdings text.
    ///
    /// # Errors
    ///
    /// Returns [`PortfolioError::InsufficientData`](crate::PortfolioError::InsufficientData)
    /// when no ticker can be recovered from `text`.
    pub fn analyze(&self, text: &str) -> PortfolioResult<PortfolioAnalysis> {
        let parsed = parse_holdings(text)?;
        let holdings = self.classifier.classify_all(&parsed);
        Ok(self.analyze_holdings(holdings, parsed.metadata))
    }

    /// Analyzes already-classified holdings.
    #[must_use]
    pub fn analyze_holdings(&self, holdings: Vec<Holding>, parse: ParseMetadata) -> PortfolioAnalysis {
        let overlaps = self.overlaps.detect(&holdings);
        let redundancy = RedundancyDetector::findings(&overlaps);
        let simplification = self.simplification.score(&holdings, &overlaps);
        let risk = self.risk.score(&holdings);
        let recommendations = self
            .recommender
            .recommend(&redundancy, &holdings, &risk.exposures);

        let consolidations = recommendations
            .iter()
            .filter_map(|r| r.consolidation.clone())
            .collect();
        let rebalance_actions = recommendations
            .iter()
            .flat_map(|r| r.actions.iter().cloned())
            .collect();

        info!(
            holdings = holdings.len(),
            findings = redundancy.len(),
            overall_risk = risk.overall_risk_score,
            simplification = simplification.score,
            recommendations = recommendations.len(),
            "portfolio analyzed"
        );

        PortfolioAnalysis {
            holdings,
            redundancy,
            risk,
            simplification,
            consolidations,
            rebalance_actions,
            recommendations,
            parse,
        }
    }

    /// Analyzes many submissions, in parallel when configured and large enough.
    ///
    /// Results are in input order and identical to calling [`analyze`](Self::analyze)
    /// on each input.
    #[must_use]
    pub fn analyze_batch(&self, inputs: &[&str]) -> Vec<PortfolioResult<PortfolioAnalysis>> {
        maybe_parallel_map(inputs, &self.config, |text| self.analyze(text))
    }
}

/// Analyzes `text` with the standard registry and default configuration.
///
/// # Errors
///
/// Returns [`PortfolioError::InsufficientData`](crate::PortfolioError::InsufficientData)
/// when no ticker can be recovered from `text`.
///
/// # Example
///
/// ```rust
/// let analysis = holdwise_portfolio::analyze("FZROX 40%, VTI 30%, BND 30%").unwrap();
/// assert_eq!(analysis.redundancy.len(), 1);
/// assert_eq!(analysis.consolidations[0].keep, "FZROX");
/// ```
pub fn analyze(text: &str) -> PortfolioResult<PortfolioAnalysis> {
    PortfolioAnalyzer::default().analyze(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortfolioError;
    use crate::types::{Category, InvestorProfile};
    use approx::assert_relative_eq;

    #[test]
    fn test_analyzer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PortfolioAnalyzer>();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = PortfolioAnalyzer::new(AnalyzerConfig::new().with_max_recommendations(0)).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig { .. }));
    }

    #[test]
    fn test_consolidations_follow_recommendations() {
        let analysis = analyze("FZROX 40%, VTI 30%, BND 30%").unwrap();
        assert_eq!(analysis.consolidations.len(), 1);
        assert_eq!(analysis.consolidations[0].sell, ["VTI"]);
        let total: usize = analysis.recommendations.iter().map(|r| r.actions.len()).sum();
        assert_eq!(analysis.rebalance_actions.len(), total);
    }

    #[test]
    fn test_custom_registry() {
        let registry = CategoryRegistry::standard()
            .into_builder()
            .category(Category::BroadMarket, ["MYFND"])
            .build();
        let analyzer = PortfolioAnalyzer::default().with_registry(registry);
        let analysis = analyzer.analyze("MYFND 50%, VTI 50%").unwrap();
        assert_eq!(analysis.redundancy.len(), 1);
    }

    #[test]
    fn test_profile_flows_through() {
        let analyzer =
            PortfolioAnalyzer::new(AnalyzerConfig::new().with_profile(InvestorProfile::Retirement))
                .unwrap();
        let analysis = analyzer.analyze("VTI 90%, VXUS 10%").unwrap();
        assert!(analysis
            .rebalance_actions
            .iter()
            .any(|a| a.ticker == "BND" && a.percentage > 0.0));
    }

    #[test]
    fn test_batch_matches_single() {
        let analyzer = PortfolioAnalyzer::new(AnalyzerConfig::default().with_threshold(2)).unwrap();
        let inputs = ["FZROX 40%, VTI 30%, BND 30%", "my retirement money", "SGOV 50%, VTI 50%"];
        let batch = analyzer.analyze_batch(&inputs);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].as_ref().unwrap(), &analyzer.analyze(inputs[0]).unwrap());
        assert!(batch[1].as_ref().unwrap_err().is_insufficient_data());
        assert_relative_eq!(batch[2].as_ref().unwrap().simplification.score, 10.0);
    }
}
