//! Domain types for portfolio analysis.
//!
//! This module provides the value types shared by every stage:
//!
//! - [`Holding`]: A classified position with weight, categories and sector
//! - [`Category`]: Closed taxonomy of market-exposure tags
//! - [`Sector`]: Descriptive sector label
//! - [`AnalyzerConfig`]: Thresholds, penalties and recommendation policy

mod category;
mod config;
mod holding;

// Re-export all types
pub use category::{Category, Sector};
pub use config::{
    AnalyzerConfig, InvestorProfile, PenaltySchedule, RecommendationPolicy, RiskThresholds,
};
pub use holding::{total_weight_where, Holding, TickerWeight};
