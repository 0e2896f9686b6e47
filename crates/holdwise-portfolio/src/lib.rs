//! # Holdwise Portfolio
//!
//! Holdings classification, redundancy detection and risk scoring for retail
//! portfolios described in free-form text.
//!
//! This crate turns a line like `FZROX 40%, VTI ~30%, BND: 30%` into a
//! structured assessment of overlapping exposure, risk and complexity, plus a
//! short list of consolidation and rebalancing suggestions.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: No network, file or database access; same input, same output
//! - **Lenient input**: Missing weights are imputed, out-of-range weights clamped
//! - **Injectable tables**: Category registry, overlap rules, fees and penalties are data
//! - **Config-driven parallelism**: Optional rayon support for batch analysis
//!
//! ## Pipeline
//!
//! ```text
//! parse_holdings ─► Classifier ─► detect_overlaps ─┬─► RedundancyDetector ─► Recommender
//!                                                  ├─► SimplificationScorer
//!                      RiskScorer ◄────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use holdwise_portfolio::prelude::*;
//!
//! let analysis = analyze("XLK 20%, AAPL 15%, MSFT 10%")?;
//!
//! assert_eq!(analysis.redundancy.len(), 1);
//! assert_eq!(analysis.risk.correlation.score, 8);
//! assert_eq!(analysis.risk.correlation.label, RiskLevel::High);
//! # Ok::<(), PortfolioError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`parser`] - Free-form holdings parser
//! - [`classification`] - Category registry, classifier and individual-stock heuristic
//! - [`redundancy`] - Overlap rules, shared overlap pass and findings
//! - [`scoring`] - Risk dimensions and simplification score
//! - [`recommend`] - Consolidation keep/sell selection and rebalance actions
//! - [`report`] - Plain-text narrative rendering
//! - [`types`] - Core types (Holding, Category, Sector, Config)
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for batch analysis

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod analysis;
pub mod classification;
pub mod error;
pub mod parallel;
pub mod parser;
pub mod recommend;
pub mod redundancy;
pub mod report;
pub mod scoring;
pub mod types;

// Re-export error types at crate root
pub use error::{PortfolioError, PortfolioResult};

// Re-export main types
pub use types::{
    AnalyzerConfig, Category, Holding, InvestorProfile, PenaltySchedule, RecommendationPolicy,
    RiskThresholds, Sector, TickerWeight,
};

// Re-export pipeline entry points
pub use analysis::{analyze, PortfolioAnalysis, PortfolioAnalyzer};
pub use classification::{CategoryRegistry, Classification, Classifier, IndividualStockHeuristic};
pub use parser::{parse_holdings, ParseMetadata, ParseSource, ParsedHoldings};
pub use recommend::{
    ConsolidationSuggestion, FeeSchedule, RebalanceAction, Recommendation, RecommendationKind,
    Recommender, TradeAction,
};
pub use redundancy::{
    detect_overlaps, Overlap, OverlapDetector, OverlapKind, OverlapRule, RedundancyDetector,
    RedundancyFinding, RedundancyOutcome,
};
pub use report::{render_report, Report};
pub use scoring::{
    ExposureSummary, RiskAssessment, RiskDimension, RiskLevel, RiskScore, SimplificationScore,
    NARRATIVE_DRIFT_BASELINE, SIGNAL_QUALITY_BASELINE,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use holdwise_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{PortfolioError, PortfolioResult};

    // Core types
    pub use crate::types::{AnalyzerConfig, Category, Holding, InvestorProfile, Sector};

    // Pipeline
    pub use crate::analysis::{analyze, PortfolioAnalysis, PortfolioAnalyzer};
    pub use crate::classification::{CategoryRegistry, Classifier};
    pub use crate::parser::parse_holdings;
    pub use crate::redundancy::{detect_overlaps, OverlapKind, RedundancyOutcome};

    // Results
    pub use crate::recommend::{RebalanceAction, Recommendation, TradeAction};
    pub use crate::report::render_report;
    pub use crate::scoring::{RiskLevel, SimplificationScore};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_compiles() {
        let err = analyze("my retirement money").unwrap_err();
        assert!(err.to_string().contains("no holdings"));
    }
}
