//! Raw overlap records shared by the detector and the simplification scorer.

use crate::types::{Category, Sector, TickerWeight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable kind of overlapping exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "scope", rename_all = "snake_case")]
pub enum OverlapKind {
    /// Two or more holdings in the same category.
    Duplication(Category),
    /// U.S. aggregate bonds held alongside a global bond fund.
    BondOverlap,
    /// A sector ETF held alongside individual stocks of that sector.
    SectorCluster(Sector),
    /// Dividend and quality factor funds held together.
    FactorOverlap,
    /// A broad index held alongside several sector ETFs.
    HiddenOverlap,
}

impl fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplication(category) => write!(f, "duplication:{category}"),
            Self::BondOverlap => f.write_str("bond-overlap"),
            Self::SectorCluster(sector) => write!(f, "sector-cluster:{}", sector.slug()),
            Self::FactorOverlap => f.write_str("factor-overlap"),
            Self::HiddenOverlap => f.write_str("hidden-overlap"),
        }
    }
}

/// One detected overlap: its kind and the holdings involved, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    /// What overlaps.
    pub kind: OverlapKind,
    /// Involved holdings.
    pub tickers: Vec<TickerWeight>,
}

impl Overlap {
    /// Creates an overlap record.
    #[must_use]
    pub fn new(kind: OverlapKind, tickers: Vec<TickerWeight>) -> Self {
        Self { kind, tickers }
    }

    /// Sum of the involved holdings' weights.
    #[must_use]
    pub fn combined_weight(&self) -> f64 {
        self.tickers.iter().map(|t| t.weight).sum()
    }

    /// Returns true if `ticker` is involved.
    #[must_use]
    pub fn involves(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t.ticker == ticker)
    }
}
