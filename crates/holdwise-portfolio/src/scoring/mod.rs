//! Risk and simplification scoring.

pub mod risk;
pub mod simplification;

pub use risk::{
    ExposureSummary, RiskAssessment, RiskDimension, RiskLevel, RiskScore, RiskScorer,
    NARRATIVE_DRIFT_BASELINE, SIGNAL_QUALITY_BASELINE,
};
pub use simplification::{ScoreFactor, SimplificationScore, SimplificationScorer};
