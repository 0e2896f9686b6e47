//! Core storage types.
//!
//! This module defines the records kept in the run store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use holdwise_portfolio::{InvestorProfile, PortfolioAnalysis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

// =============================================================================
// RUN ID
// =============================================================================

/// Identifier of one stored analysis run (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, for display in tables.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Storage key (hyphenated lowercase form).
    #[must_use]
    pub fn key(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for RunId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| StorageError::InvalidKey(format!("{s}: {e}")))
    }
}

// =============================================================================
// ANALYSIS RECORD
// =============================================================================

/// A stored analysis together with the text it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Run identifier.
    pub run_id: RunId,
    /// When the run was stored.
    pub created_at: DateTime<Utc>,
    /// Raw holdings text as submitted.
    pub input: String,
    /// Investor profile the analysis was run with.
    #[serde(default)]
    pub profile: InvestorProfile,
    /// Optional user label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The analysis result.
    pub analysis: PortfolioAnalysis,
}

impl AnalysisRecord {
    /// Creates a record with a fresh id stamped now.
    pub fn new(input: impl Into<String>, analysis: PortfolioAnalysis) -> Self {
        Self {
            run_id: RunId::new(),
            created_at: Utc::now(),
            input: input.into(),
            profile: InvestorProfile::default(),
            label: None,
            analysis,
        }
    }

    /// Sets the investor profile.
    #[must_use]
    pub fn with_profile(mut self, profile: InvestorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overrides the creation time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether the analysed portfolio holds `ticker` (case-insensitive).
    #[must_use]
    pub fn holds(&self, ticker: &str) -> bool {
        self.analysis
            .holdings
            .iter()
            .any(|h| h.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Condensed view for listings.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            created_at: self.created_at,
            label: self.label.clone(),
            holdings: self.analysis.holdings.len(),
            findings: self.analysis.redundancy.len(),
            overall_risk_score: self.analysis.risk.overall_risk_score,
            simplification: self.analysis.simplification.score,
        }
    }
}

/// One row of a run listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier.
    pub run_id: RunId,
    /// When the run was stored.
    pub created_at: DateTime<Utc>,
    /// Optional user label.
    pub label: Option<String>,
    /// Number of holdings.
    pub holdings: usize,
    /// Number of redundancy findings.
    pub findings: usize,
    /// Overall risk score (0-10).
    pub overall_risk_score: u8,
    /// Simplification score (1-10).
    pub simplification: f64,
}

// =============================================================================
// FILTER
// =============================================================================

/// Filter for run listings.
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    /// Only runs whose portfolio holds this ticker.
    pub ticker: Option<String>,
    /// Only runs stored at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

impl RunFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ticker filter.
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Sets the lower time bound.
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Sets the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether `record` passes the ticker and time predicates.
    #[must_use]
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        if let Some(ref ticker) = self.ticker {
            if !record.holds(ticker) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.created_at < since {
                return false;
            }
        }
        true
    }

    /// Sorts newest first, then applies predicates and pagination.
    pub(crate) fn apply(filter: Option<&Self>, mut records: Vec<AnalysisRecord>) -> Vec<AnalysisRecord> {
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        let offset = filter.and_then(|f| f.offset).unwrap_or(0);
        let limit = filter.and_then(|f| f.limit).unwrap_or(usize::MAX);
        records
            .into_iter()
            .filter(|r| filter.map_or(true, |f| f.matches(r)))
            .skip(offset)
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(text: &str) -> AnalysisRecord {
        AnalysisRecord::new(text, holdwise_portfolio::analyze(text).unwrap())
    }

    #[test]
    fn test_run_id_parse_display() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn test_run_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<RunId>().unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn test_record_summary() {
        let rec = record("FZROX 40%, VTI 30%, BND 30%").with_label("ira");
        let summary = rec.summary();
        assert_eq!(summary.run_id, rec.run_id);
        assert_eq!(summary.holdings, 3);
        assert_eq!(summary.findings, 1);
        assert_eq!(summary.label.as_deref(), Some("ira"));
        assert!(rec.holds("vti"));
        assert!(!rec.holds("QQQ"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let rec = record("XLK 20%, AAPL 15%, MSFT 10%").with_profile(InvestorProfile::Growth);
        let json = serde_json::to_string(&rec).unwrap();
        let back: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert!(!json.contains("\"label\""));
    }

    #[test]
    fn test_filter_order_and_pagination() {
        let now = Utc::now();
        let records: Vec<_> = (0..5)
            .map(|i| record("VTI 60%, BND 40%").with_created_at(now - Duration::minutes(i)))
            .collect();
        let newest = records[0].run_id;

        let all = RunFilter::apply(None, records.clone());
        assert_eq!(all[0].run_id, newest);

        let page = RunFilter::apply(Some(&RunFilter::new().offset(1).limit(2)), records.clone());
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].run_id, records[1].run_id);

        let recent = RunFilter::apply(
            Some(&RunFilter::new().since(now - Duration::seconds(90))),
            records,
        );
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_filter_by_ticker() {
        let filter = RunFilter::new().ticker("xlk");
        assert!(filter.matches(&record("XLK 50%, VTI 50%")));
        assert!(!filter.matches(&record("VTI 50%, BND 50%")));
    }
}
