//! Free-form holdings parser.
//!
//! Accepts whatever a person types when describing a portfolio:
//!
//! ```text
//! FZROX 40%, VTI ~30%
//! BND: 30%
//! 50% SGOV
//! ```
//!
//! The parser is deliberately lenient. Weights outside `(0, 100]` are clamped,
//! missing weights are imputed as an equal share, and when no structured
//! token yields a ticker the whole text is scanned as a last resort. The only
//! failure is input with no ticker-shaped word at all.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::TickerWeight;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, warn};

/// Lowest weight a holding may carry after clamping.
pub const MIN_WEIGHT: f64 = 0.1;

/// Highest weight a holding may carry after clamping.
pub const MAX_WEIGHT: f64 = 100.0;

static TOKEN_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\n\t]").expect("token separator pattern is valid"));

static WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("weight pattern is valid"));

static TICKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{1,5}(?:\.[A-Z]{1,2})?\b").expect("ticker pattern is valid")
});

static BARE_TICKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{1,5}(?:\.[A-Z]{1,2})?$").expect("bare ticker pattern is valid")
});

/// Capitalized words that read as prose, not tickers.
const PROSE_WORDS: [&str; 2] = ["I", "A"];

/// Lowercase words that describe holdings rather than name them.
const PLAIN_WORDS: [&str; 12] = [
    "cash", "bonds", "stocks", "other", "money", "my", "in", "and", "the", "of", "fund", "funds",
];

/// Which pass produced the parsed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseSource {
    /// Token-by-token parse of separated entries.
    #[default]
    Structured,
    /// Whole-text scan after the structured pass found nothing.
    Fallback,
}

/// A weight that was outside `(0, 100]` and got clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampedWeight {
    /// Ticker the weight belonged to.
    pub ticker: String,
    /// Weight as typed (or imputed).
    pub original: f64,
    /// Weight after clamping.
    pub clamped: f64,
}

/// How the holdings were recovered from the text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseMetadata {
    /// Pass that produced the entries.
    pub source: ParseSource,
    /// Tickers whose weight was imputed as an equal share.
    pub imputed: Vec<String>,
    /// Weights that were clamped into range.
    pub clamped: Vec<ClampedWeight>,
}

impl ParseMetadata {
    /// Returns true if any weight was imputed.
    #[must_use]
    pub fn weights_imputed(&self) -> bool {
        !self.imputed.is_empty()
    }
}

/// Parser output: ordered `(ticker, weight)` entries plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedHoldings {
    /// Entries in first-seen order.
    pub entries: Vec<TickerWeight>,
    /// Parse path and recoveries.
    pub metadata: ParseMetadata,
}

impl ParsedHoldings {
    /// Number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the parsed tickers.
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.ticker.as_str())
    }
}

/// Ordered ticker accumulator; later weights replace earlier ones in place.
#[derive(Default)]
struct EntryList {
    order: Vec<String>,
    weights: HashMap<String, Option<f64>>,
}

impl EntryList {
    fn push(&mut self, ticker: &str, weight: Option<f64>) {
        match self.weights.get_mut(ticker) {
            Some(existing) => {
                if weight.is_some() {
                    debug!(ticker, ?weight, "duplicate ticker, later weight wins");
                    *existing = weight;
                }
            }
            None => {
                self.order.push(ticker.to_string());
                self.weights.insert(ticker.to_string(), weight);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn finish(self, source: ParseSource) -> ParsedHoldings {
        let share = MAX_WEIGHT / self.order.len() as f64;
        let mut metadata = ParseMetadata {
            source,
            ..ParseMetadata::default()
        };

        let entries = self
            .order
            .into_iter()
            .map(|ticker| {
                let raw = match self.weights.get(&ticker).copied().flatten() {
                    Some(weight) => weight,
                    None => {
                        metadata.imputed.push(ticker.clone());
                        share
                    }
                };
                let weight = clamp_weight(raw);
                if weight != raw {
                    warn!(ticker = %ticker, original = raw, clamped = weight, "weight out of range, clamped");
                    metadata.clamped.push(ClampedWeight {
                        ticker: ticker.clone(),
                        original: raw,
                        clamped: weight,
                    });
                }
                TickerWeight::new(ticker, weight)
            })
            .collect();

        ParsedHoldings { entries, metadata }
    }
}

/// Clamps a weight into `[MIN_WEIGHT, MAX_WEIGHT]`.
#[must_use]
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return MIN_WEIGHT;
    }
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Parses free-form holdings text into ordered `(ticker, weight)` entries.
///
/// # Errors
///
/// Returns [`PortfolioError::InsufficientData`] when neither the structured
/// pass nor the whole-text fallback finds a single ticker.
///
/// # Example
///
/// ```rust
/// use holdwise_portfolio::parser::parse_holdings;
///
/// let parsed = parse_holdings("FZROX 40%, VTI ~30%\nBND: 30%").unwrap();
/// let tickers: Vec<_> = parsed.tickers().collect();
/// assert_eq!(tickers, ["FZROX", "VTI", "BND"]);
/// ```
pub fn parse_holdings(text: &str) -> PortfolioResult<ParsedHoldings> {
    let structured = parse_structured(text);
    if !structured.is_empty() {
        let parsed = structured.finish(ParseSource::Structured);
        debug!(entries = parsed.len(), "structured parse succeeded");
        return Ok(parsed);
    }

    let fallback = parse_fallback(text);
    if fallback.is_empty() {
        debug!(input_len = text.len(), "no ticker-shaped words found");
        return Err(PortfolioError::insufficient_data(text));
    }

    let parsed = fallback.finish(ParseSource::Fallback);
    warn!(
        entries = parsed.len(),
        "no structured entries found, recovered tickers by scanning the whole text"
    );
    Ok(parsed)
}

fn parse_structured(text: &str) -> EntryList {
    let mut entries = EntryList::default();

    for raw in TOKEN_SPLIT.split(text) {
        let token = raw.replace('~', "");
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match WEIGHT.captures(token) {
            Some(caps) => {
                let weight = caps[1].parse::<f64>().ok();
                let span = caps.get(0).map_or(0..0, |m| m.range());
                match weighted_ticker(token, &span) {
                    Some(ticker) => {
                        debug!(token, ticker = %ticker, ?weight, "weighted token");
                        entries.push(&ticker, weight);
                    }
                    None => debug!(token, "weight without ticker, dropped"),
                }
            }
            None => {
                let words = split_words(token);
                let lowercase = !token.chars().any(|c| c.is_ascii_uppercase());
                let tickers: Option<Vec<String>> = words
                    .iter()
                    .map(|w| {
                        if lowercase {
                            lowercase_ticker(w)
                        } else {
                            BARE_TICKER.is_match(w).then(|| w.to_string())
                        }
                    })
                    .collect();
                match tickers {
                    Some(tickers) => {
                        for ticker in tickers {
                            debug!(token, ticker = %ticker, "unweighted ticker");
                            entries.push(&ticker, None);
                        }
                    }
                    None => debug!(token, "no structured entry in token"),
                }
            }
        }
    }

    entries
}

fn split_words(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ':' || c == ';')
        .filter(|w| !w.is_empty())
        .collect()
}

/// Byte distance between a ticker candidate and the weight it may belong to.
fn gap(candidate: &Range<usize>, weight: &Range<usize>) -> usize {
    if candidate.end <= weight.start {
        weight.start - candidate.end
    } else {
        candidate.start.saturating_sub(weight.end)
    }
}

/// Picks the ticker a weighted token refers to.
///
/// The candidate closest to the weight wins; ties go to the earlier one. A
/// token typed entirely in lowercase is accepted when the only other word in
/// it is ticker-shaped.
fn weighted_ticker(token: &str, weight: &Range<usize>) -> Option<String> {
    let candidates: Vec<_> = TICKER.find_iter(token).collect();
    let chosen = candidates
        .iter()
        .filter(|m| !PROSE_WORDS.contains(&m.as_str()))
        .min_by_key(|m| gap(&m.range(), weight));
    if let Some(m) = chosen {
        return Some(m.as_str().to_string());
    }

    if !token.chars().any(|c| c.is_ascii_uppercase()) {
        let rest = format!("{} {}", &token[..weight.start], &token[weight.end..]);
        if let [word] = split_words(&rest).as_slice() {
            return lowercase_ticker(word);
        }
    }

    candidates.first().map(|m| m.as_str().to_string())
}

fn lowercase_ticker(word: &str) -> Option<String> {
    if PLAIN_WORDS.contains(&word) {
        return None;
    }
    let upper = word.to_ascii_uppercase();
    BARE_TICKER.is_match(&upper).then_some(upper)
}

fn parse_fallback(text: &str) -> EntryList {
    let mut entries = EntryList::default();
    for m in TICKER.find_iter(text) {
        if !PROSE_WORDS.contains(&m.as_str()) {
            entries.push(m.as_str(), None);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weights(parsed: &ParsedHoldings) -> Vec<(&str, f64)> {
        parsed
            .entries
            .iter()
            .map(|e| (e.ticker.as_str(), e.weight))
            .collect()
    }

    #[test]
    fn test_weight_positions() {
        let parsed = parse_holdings("50% SGOV, VTI 20%, BND:10%, VXUS ~20%").unwrap();
        assert_eq!(
            weights(&parsed),
            vec![("SGOV", 50.0), ("VTI", 20.0), ("BND", 10.0), ("VXUS", 20.0)]
        );
        assert_eq!(parsed.metadata.source, ParseSource::Structured);
        assert!(!parsed.metadata.weights_imputed());
    }

    #[test]
    fn test_newline_and_tab_separators() {
        let parsed = parse_holdings("FZROX 40%\nVTI 30%\tBND 30%").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.tickers().collect::<Vec<_>>(), ["FZROX", "VTI", "BND"]);
    }

    #[test]
    fn test_decimal_weights_and_dotted_tickers() {
        let parsed = parse_holdings("BRK.B 12.5%, AAPL 7.25 %").unwrap();
        assert_eq!(weights(&parsed), vec![("BRK.B", 12.5), ("AAPL", 7.25)]);
    }

    #[test]
    fn test_unweighted_list_imputes_equal_share() {
        let parsed = parse_holdings("VTI BND SGOV, VXUS").unwrap();
        assert_eq!(parsed.len(), 4);
        for entry in &parsed.entries {
            assert_relative_eq!(entry.weight, 25.0);
        }
        assert_eq!(parsed.metadata.imputed.len(), 4);
    }

    #[test]
    fn test_mixed_weighted_and_unweighted() {
        let parsed = parse_holdings("VTI 60%, BND").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 60.0), ("BND", 50.0)]);
        assert_eq!(parsed.metadata.imputed, vec!["BND".to_string()]);
    }

    #[test]
    fn test_duplicate_ticker_keeps_position_later_weight() {
        let parsed = parse_holdings("VTI 20%, BND 30%, VTI 50%").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 50.0), ("BND", 30.0)]);
    }

    #[test]
    fn test_duplicate_unweighted_does_not_erase_weight() {
        let parsed = parse_holdings("VTI 20%, VTI").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 20.0)]);
    }

    #[test]
    fn test_out_of_range_weights_are_clamped() {
        let parsed = parse_holdings("VTI 150%, BND 0%").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 100.0), ("BND", 0.1)]);
        assert_eq!(parsed.metadata.clamped.len(), 2);
        assert_relative_eq!(parsed.metadata.clamped[0].original, 150.0);
    }

    #[test]
    fn test_prose_token_skips_pronoun() {
        let parsed = parse_holdings("I have 40% in FZROX").unwrap();
        assert_eq!(weights(&parsed), vec![("FZROX", 40.0)]);
    }

    #[test]
    fn test_token_without_candidate_dropped() {
        let parsed = parse_holdings("VTI 50%, 20% cash, BND 30%").unwrap();
        assert_eq!(parsed.tickers().collect::<Vec<_>>(), ["VTI", "BND"]);
    }

    #[test]
    fn test_lowercase_tickers_uppercased() {
        let parsed = parse_holdings("vti 50%, bnd 50%").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 50.0), ("BND", 50.0)]);
        assert_eq!(parsed.metadata.source, ParseSource::Structured);

        let parsed = parse_holdings("fzrox, vxus sgov").unwrap();
        assert_eq!(parsed.tickers().collect::<Vec<_>>(), ["FZROX", "VXUS", "SGOV"]);
    }

    #[test]
    fn test_lowercase_asset_words_not_tickers() {
        let parsed = parse_holdings("vti 80%, 20% cash").unwrap();
        assert_eq!(weights(&parsed), vec![("VTI", 80.0)]);
        assert!(parse_holdings("my retirement money").is_err());
    }

    #[test]
    fn test_weight_binds_to_nearest_ticker() {
        let parsed = parse_holdings("Roth IRA: VOO 40%, BND 60%").unwrap();
        assert_eq!(weights(&parsed), vec![("VOO", 40.0), ("BND", 60.0)]);

        let parsed = parse_holdings("40% SGOV in my HSA").unwrap();
        assert_eq!(weights(&parsed), vec![("SGOV", 40.0)]);
    }

    #[test]
    fn test_fallback_scan() {
        let parsed = parse_holdings("I own mostly VTI and some BND").unwrap();
        assert_eq!(parsed.metadata.source, ParseSource::Fallback);
        assert_eq!(weights(&parsed), vec![("VTI", 50.0), ("BND", 50.0)]);
    }

    #[test]
    fn test_insufficient_data() {
        let err = parse_holdings("my retirement money").unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(parse_holdings("").unwrap_err().is_insufficient_data());
        assert!(parse_holdings("   ,\n\t").unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_clamp_weight() {
        assert_relative_eq!(clamp_weight(-5.0), MIN_WEIGHT);
        assert_relative_eq!(clamp_weight(250.0), MAX_WEIGHT);
        assert_relative_eq!(clamp_weight(33.3), 33.3);
        assert_relative_eq!(clamp_weight(f64::NAN), MIN_WEIGHT);
    }
}
