//! Integration tests for the run store backends.

use holdwise_portfolio::{analyze, InvestorProfile};
use holdwise_storage::prelude::*;
use proptest::prelude::*;
use tempfile::tempdir;

fn record(text: &str) -> AnalysisRecord {
    AnalysisRecord::new(text, analyze(text).unwrap())
}

fn backends(dir: &std::path::Path) -> Vec<Box<dyn AnalysisStore>> {
    vec![
        Box::new(InMemoryStorage::new()),
        Box::new(RedbStorage::open(dir.join("runs.redb")).unwrap()),
    ]
}

// =============================================================================
// BACKEND PARITY
// =============================================================================

#[test]
fn test_backends_agree() {
    let dir = tempdir().unwrap();
    let records = [
        record("FZROX 40%, VTI 30%, BND 30%"),
        record("XLK 20%, AAPL 15%, MSFT 10%").with_label("tech"),
        record("SGOV 50%, VTI 50%").with_profile(InvestorProfile::Retirement),
    ];

    for store in backends(dir.path()) {
        for rec in &records {
            store.put(rec).unwrap();
        }
        assert_eq!(store.count(None).unwrap(), 3, "{}", store.backend_name());
        for rec in &records {
            assert_eq!(&store.require(&rec.run_id).unwrap(), rec);
        }

        let vti = store.list(Some(&RunFilter::new().ticker("VTI"))).unwrap();
        assert_eq!(vti.len(), 2);

        assert!(store.delete(&records[0].run_id).unwrap());
        assert_eq!(store.stats().unwrap().run_count, 2);
    }
}

#[test]
fn test_redb_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runs.redb");
    let rec = record("VOO 25%, SPY 10%, BND 15%, BNDX 15%, XLK 35%");

    {
        let store = RedbStorage::open(&path).unwrap();
        store.put(&rec).unwrap();
    }

    let store = RedbStorage::open(&path).unwrap();
    let loaded = store.require(&rec.run_id).unwrap();
    assert_eq!(loaded.analysis, rec.analysis);
    assert_eq!(store.resolve(&rec.run_id.short()).unwrap(), rec.run_id);
}

#[test]
fn test_missing_run_is_not_found() {
    let store = InMemoryStorage::new();
    let err = store.require(&RunId::new()).unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn property_put_get_round_trip(
        weights in prop::collection::vec(1u32..=60, 1..5),
        label in proptest::option::of("[a-z]{1,12}"),
    ) {
        let tickers = ["VTI", "BND", "XLK", "AAPL"];
        let text = weights
            .iter()
            .zip(tickers)
            .map(|(w, t)| format!("{t} {w}%"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut rec = record(&text);
        rec.label = label;

        let store = InMemoryStorage::new();
        store.put(&rec).unwrap();
        prop_assert_eq!(store.get(&rec.run_id).unwrap(), Some(rec));
    }
}
