//! Simplification (complexity) scoring.
//!
//! Starts at 10 and deducts a penalty for every overlap found by
//! [`detect_overlaps`](crate::redundancy::detect_overlaps), plus a penalty
//! for very long holding lists. The result is clamped to `[1, 10]` and
//! rounded to one decimal.

use crate::redundancy::{Overlap, OverlapKind};
use crate::types::{Category, Holding, PenaltySchedule};
use serde::{Deserialize, Serialize};

/// Highest possible simplification score.
pub const MAX_SIMPLIFICATION_SCORE: f64 = 10.0;

/// Lowest possible simplification score.
pub const MIN_SIMPLIFICATION_SCORE: f64 = 1.0;

/// Scores at or above this mention simplicity factors in the explanation.
const SIMPLE_PORTFOLIO_SCORE: f64 = 7.0;

/// Holding counts at or below this count as compact.
const COMPACT_PORTFOLIO_COUNT: usize = 5;

/// A factor that moved the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// What was observed.
    pub description: String,
    /// Points deducted (zero for simplicity factors).
    pub points: f64,
}

impl ScoreFactor {
    fn new(description: impl Into<String>, points: f64) -> Self {
        Self {
            description: description.into(),
            points,
        }
    }
}

/// Simplification score with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplificationScore {
    /// Score in `[1, 10]`, one decimal.
    pub score: f64,
    /// Plain-language summary of the main drivers.
    pub explanation: String,
    /// Penalized factors, in overlap-rule order.
    pub complexity_factors: Vec<ScoreFactor>,
    /// Positive observations, in a fixed order.
    pub simplicity_factors: Vec<ScoreFactor>,
}

/// Prices overlaps with a [`PenaltySchedule`].
#[derive(Debug, Clone, Default)]
pub struct SimplificationScorer {
    penalties: PenaltySchedule,
}

impl SimplificationScorer {
    /// Creates a scorer with the given penalties.
    #[must_use]
    pub fn new(penalties: PenaltySchedule) -> Self {
        Self { penalties }
    }

    /// Penalty for one overlap kind.
    #[must_use]
    pub fn penalty_for(&self, kind: OverlapKind) -> f64 {
        let p = &self.penalties;
        match kind {
            OverlapKind::Duplication(category) => match category {
                Category::BroadMarket | Category::Sp500Index => p.index_duplication,
                Category::BondAggregateUs => p.bond_duplication,
                Category::DividendFactor => p.dividend_duplication,
                Category::InternationalEquity => p.international_duplication,
                Category::TreasuryShort | Category::Tips => p.cash_like_duplication,
                _ => p.niche_duplication,
            },
            OverlapKind::BondOverlap => p.bond_overlap,
            OverlapKind::SectorCluster(_) => p.sector_cluster,
            OverlapKind::FactorOverlap => p.factor_overlap,
            OverlapKind::HiddenOverlap => p.hidden_overlap,
        }
    }

    /// Penalty for the holding count.
    #[must_use]
    pub fn holding_count_penalty(&self, count: usize) -> f64 {
        let p = &self.penalties;
        if count > p.large_portfolio_count {
            p.large_portfolio
        } else if count > p.medium_portfolio_count {
            p.medium_portfolio
        } else {
            0.0
        }
    }

    /// Scores `holdings` given the overlaps already detected for them.
    #[must_use]
    pub fn score(&self, holdings: &[Holding], overlaps: &[Overlap]) -> SimplificationScore {
        let mut complexity_factors: Vec<ScoreFactor> = overlaps
            .iter()
            .map(|overlap| {
                ScoreFactor::new(describe_overlap(overlap), self.penalty_for(overlap.kind))
            })
            .collect();

        let count_penalty = self.holding_count_penalty(holdings.len());
        if count_penalty > 0.0 {
            complexity_factors.push(ScoreFactor::new(
                format!("{} separate holdings to track", holdings.len()),
                count_penalty,
            ));
        }

        let total_penalty: f64 = complexity_factors.iter().map(|f| f.points).sum();
        let score = round_one_decimal(
            (MAX_SIMPLIFICATION_SCORE - total_penalty)
                .clamp(MIN_SIMPLIFICATION_SCORE, MAX_SIMPLIFICATION_SCORE),
        );

        let simplicity_factors = simplicity_factors(holdings, overlaps);
        let explanation = explain(score, &complexity_factors, &simplicity_factors);

        SimplificationScore {
            score,
            explanation,
            complexity_factors,
            simplicity_factors,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn describe_overlap(overlap: &Overlap) -> String {
    let tickers: Vec<&str> = overlap.tickers.iter().map(|t| t.ticker.as_str()).collect();
    let tickers = tickers.join(", ");
    match overlap.kind {
        OverlapKind::Duplication(category) => {
            format!("Duplicate {} ({tickers})", category.label())
        }
        OverlapKind::BondOverlap => format!("U.S. and global bond funds overlap ({tickers})"),
        OverlapKind::SectorCluster(sector) => {
            format!("{} ETF plus individual stocks ({tickers})", sector.label())
        }
        OverlapKind::FactorOverlap => format!("Dividend and quality funds overlap ({tickers})"),
        OverlapKind::HiddenOverlap => {
            format!("Broad index already covers sector ETFs ({tickers})")
        }
    }
}

fn simplicity_factors(holdings: &[Holding], overlaps: &[Overlap]) -> Vec<ScoreFactor> {
    let mut factors = Vec::new();
    if overlaps.is_empty() {
        factors.push(ScoreFactor::new("No overlapping funds", 0.0));
    }
    if holdings.len() <= COMPACT_PORTFOLIO_COUNT {
        factors.push(ScoreFactor::new(
            format!("Only {} holdings to manage", holdings.len()),
            0.0,
        ));
    }
    if holdings
        .iter()
        .any(|h| h.has_category(Category::BroadMarket) || h.has_category(Category::Sp500Index))
    {
        factors.push(ScoreFactor::new("Built on a broad index core", 0.0));
    }
    if holdings.iter().any(Holding::is_bond) {
        factors.push(ScoreFactor::new("Dedicated bond allocation", 0.0));
    }
    if holdings
        .iter()
        .any(|h| h.has_category(Category::InternationalEquity))
    {
        factors.push(ScoreFactor::new("International diversification", 0.0));
    }
    factors
}

fn explain(score: f64, complexity: &[ScoreFactor], simplicity: &[ScoreFactor]) -> String {
    let mut ranked: Vec<&ScoreFactor> = complexity.iter().collect();
    // stable sort keeps rule order among equal penalties
    ranked.sort_by(|a, b| b.points.total_cmp(&a.points));

    let mut explanation = if ranked.is_empty() {
        "No redundant holdings or complexity penalties found.".to_string()
    } else {
        let drivers: Vec<String> = ranked
            .iter()
            .take(2)
            .map(|f| format!("{} (-{:.1})", f.description, f.points))
            .collect();
        format!("Main complexity drivers: {}.", drivers.join("; "))
    };

    if score >= SIMPLE_PORTFOLIO_SCORE && !simplicity.is_empty() {
        let strengths: Vec<&str> = simplicity
            .iter()
            .take(2)
            .map(|f| f.description.as_str())
            .collect();
        explanation.push_str(&format!(" Strengths: {}.", strengths.join("; ")));
    }

    explanation
}
