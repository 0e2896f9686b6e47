//! Property-based tests for analysis invariants.
//!
//! These tests verify properties that should hold for any input:
//! - Parsing formatted holdings recovers the same tickers and weights
//! - Scores stay within their documented bounds
//! - Adding overlap never raises the simplification score
//! - Every assigned category belongs to the closed taxonomy
//! - Every ticker in the built-in tables classifies into its own table
//! - Ticker case does not change what the parser recovers

use holdwise_portfolio::prelude::*;
use holdwise_portfolio::scoring::simplification::SimplificationScorer;
use holdwise_portfolio::PenaltySchedule;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

const UNIVERSE: &[&str] = &[
    "FZROX", "VTI", "ITOT", "VOO", "SPY", "QQQ", "QQQM", "BND", "AGG", "BNDX", "BNDW", "SGOV",
    "BIL", "TIP", "SCHP", "VXUS", "VEA", "SCHD", "VYM", "QUAL", "GLD", "IAU", "VNQ", "DBC", "XLK",
    "XLV", "XLF", "XLE", "AAPL", "MSFT", "JPM", "JNJ", "BRK.B", "PLTR", "ZETF",
];

prop_compose! {
    /// Distinct tickers with integer weights in 1..=100.
    fn holdings_strategy(max: usize)
        (entries in prop::collection::btree_map(prop::sample::select(UNIVERSE), 1u32..=100, 1..max))
        -> Vec<(String, f64)>
    {
        entries.into_iter().map(|(t, w)| (t.to_string(), f64::from(w))).collect()
    }
}

fn format_holdings(entries: &[(String, f64)], separator: &str) -> String {
    entries
        .iter()
        .map(|(ticker, weight)| format!("{ticker} {weight}%"))
        .collect::<Vec<_>>()
        .join(separator)
}

fn all_categories() -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = [
        "broad-market",
        "sp500-index",
        "nasdaq100-index",
        "bond-aggregate-us",
        "bond-global",
        "treasury-short",
        "tips",
        "international-equity",
        "dividend-factor",
        "quality-factor",
        "individual-stock",
        "gold",
        "real-estate",
        "commodity",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    for sector in Sector::all() {
        tags.insert(format!("sector-etf:{}", sector.slug()));
    }
    tags
}

// =============================================================================
// PARSER ROUND-TRIP
// =============================================================================

proptest! {
    #[test]
    fn property_parser_round_trip(
        entries in holdings_strategy(12),
        separator in prop::sample::select(vec![", ", "\n", "\t", ","]),
    ) {
        let text = format_holdings(&entries, separator);
        let parsed = parse_holdings(&text).unwrap();

        let recovered: Vec<(String, f64)> = parsed
            .entries
            .iter()
            .map(|e| (e.ticker.clone(), e.weight))
            .collect();
        prop_assert_eq!(recovered, entries);
        prop_assert!(parsed.metadata.clamped.is_empty());
    }

    #[test]
    fn property_parser_ignores_case(entries in holdings_strategy(12)) {
        let text = format_holdings(&entries, ", ");
        let lower = parse_holdings(&text.to_lowercase()).unwrap();
        prop_assert_eq!(lower.entries, parse_holdings(&text).unwrap().entries);
    }

    #[test]
    fn property_parsed_weights_in_range(text in "[A-Z ,%0-9.~\n]{0,80}") {
        if let Ok(parsed) = parse_holdings(&text) {
            for entry in &parsed.entries {
                prop_assert!(entry.weight >= 0.1 && entry.weight <= 100.0);
            }
        }
    }
}

// =============================================================================
// SCORE BOUNDS
// =============================================================================

proptest! {
    #[test]
    fn property_scores_within_bounds(entries in holdings_strategy(25)) {
        let analysis = analyze(&format_holdings(&entries, ", ")).unwrap();

        let s = analysis.simplification.score;
        prop_assert!((1.0..=10.0).contains(&s));
        prop_assert!(((s * 10.0).round() - s * 10.0).abs() < 1e-9);

        for score in analysis.risk.scores() {
            prop_assert!(score.score <= 10);
        }
        prop_assert!(analysis.risk.overall_risk_score <= 10);
        prop_assert!(analysis.recommendations.len() <= 6);
    }

    #[test]
    fn property_sells_negative_buys_positive(entries in holdings_strategy(15)) {
        let analysis = analyze(&format_holdings(&entries, ", ")).unwrap();
        for action in &analysis.rebalance_actions {
            match action.action {
                TradeAction::Sell => prop_assert!(action.percentage <= 0.0),
                TradeAction::Buy => prop_assert!(action.percentage >= 0.0),
            }
        }
    }
}

// =============================================================================
// MONOTONIC PENALTY
// =============================================================================

proptest! {
    #[test]
    fn property_adding_holdings_never_simplifies(
        entries in holdings_strategy(10),
        extra in prop::sample::select(UNIVERSE),
    ) {
        let classifier = Classifier::standard();
        let scorer = SimplificationScorer::new(PenaltySchedule::default());

        let base_text = format_holdings(&entries, ", ");
        let base = classifier.classify_all(&parse_holdings(&base_text).unwrap());
        let base_score = scorer.score(&base, &detect_overlaps(&base)).score;

        let grown_text = format!("{base_text}, {extra} 5%");
        let grown = classifier.classify_all(&parse_holdings(&grown_text).unwrap());
        let grown_score = scorer.score(&grown, &detect_overlaps(&grown)).score;

        prop_assert!(grown_score <= base_score);
    }
}

// =============================================================================
// CATEGORY CLOSURE
// =============================================================================

proptest! {
    #[test]
    fn property_categories_closed(ticker in "[A-Z]{1,6}(\\.[A-Z]{1,2})?") {
        let known = all_categories();
        let classification = Classifier::standard().classify(&ticker);
        for category in &classification.categories {
            prop_assert!(known.contains(&category.to_string()));
        }
    }

    #[test]
    fn property_idempotent(entries in holdings_strategy(12)) {
        let text = format_holdings(&entries, "\n");
        prop_assert_eq!(analyze(&text).unwrap(), analyze(&text).unwrap());
    }
}

#[test]
fn test_registry_tables_classify_into_their_category() {
    let registry = CategoryRegistry::standard();
    let classifier = Classifier::new(registry.clone());
    let mut checked = 0;
    for category in registry.categories() {
        for ticker in registry.tickers(category) {
            let classification = classifier.classify(ticker);
            assert!(
                classification.categories.contains(&category),
                "{ticker} is listed under {category} but classified as {:?}",
                classification.categories
            );
            checked += 1;
        }
    }
    assert!(checked > 100);
}
