//! Redundant exposure detection.
//!
//! Detection runs as a table of [`OverlapRule`]s:
//!
//! 1. Same-category duplication (broad market, S&P 500, Nasdaq-100, U.S.
//!    aggregate bonds, international, dividend, gold, REITs, short
//!    treasuries, TIPS)
//! 2. U.S. aggregate + global bond overlap
//! 3. Sector ETF + individual stock clusters (Technology, Healthcare, Finance)
//! 4. Dividend + quality factor overlap
//! 5. Hidden overlap: a broad index beside three or more sector ETFs
//!
//! [`detect_overlaps`] produces the raw [`Overlap`] list once; the
//! [`RedundancyDetector`] labels it for users and the simplification scorer
//! prices it.

mod detector;
mod overlap;
pub mod rules;

pub use detector::{
    detect_overlaps, OverlapDetector, RedundancyDetector, RedundancyFinding, RedundancyOutcome,
};
pub use overlap::{Overlap, OverlapKind};
pub use rules::OverlapRule;
