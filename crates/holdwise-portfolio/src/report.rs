//! Plain-text narrative report.
//!
//! Renders a [`PortfolioAnalysis`] into titled sections using `{placeholder}`
//! templates. Pure presentation: nothing here changes a score.

use crate::analysis::PortfolioAnalysis;
use crate::parser::ParseSource;
use crate::redundancy::RedundancyOutcome;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

const OVERVIEW: &str = "You hold {count} positions totaling {total}%. \
Overall risk is {overall}/10 ({overall_label}) and the simplification score is {simplification}/10.";

const NO_REDUNDANCY: &str = "No overlapping holdings were found. Each position adds distinct exposure.";

const FINDING: &str = "- {category}: {tickers} ({weight}% combined). {reason}";

const RISK_LINE: &str = "- {dimension}: {score}/10 ({label}){note}";

const EXPOSURES: &str = "Technology exposure is {tech}%, bonds {bonds}%, international {intl}%.";

const RECOMMENDATION: &str = "{index}. {title}: {rationale}";

const ACTION: &str = "   {action} {ticker}: {amount}";

/// Substitutes `{name}` placeholders; unknown names are left as written.
#[must_use]
pub fn fill(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// One titled report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section heading.
    pub title: String,
    /// Section text (may span several lines).
    pub body: String,
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    /// Sections in display order.
    pub sections: Vec<ReportSection>,
}

impl Report {
    fn push(&mut self, title: &str, body: String) {
        self.sections.push(ReportSection {
            title: title.to_string(),
            body,
        });
    }

    /// Looks up a section by title.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.title.to_uppercase())?;
            writeln!(f, "{}", section.body)?;
        }
        Ok(())
    }
}

fn pct(value: f64) -> String {
    format!("{value:.1}")
}

/// Renders the narrative report for an analysis.
#[must_use]
pub fn render_report(analysis: &PortfolioAnalysis) -> Report {
    let mut report = Report::default();
    let risk = &analysis.risk;
    let exposures = &risk.exposures;

    let values = HashMap::from([
        ("count", analysis.holdings.len().to_string()),
        ("total", pct(exposures.total_weight)),
        ("overall", risk.overall_risk_score.to_string()),
        ("overall_label", risk.overall_label.to_string()),
        ("simplification", pct(analysis.simplification.score)),
    ]);
    report.push("Overview", fill(OVERVIEW, &values));

    let redundancy = match &analysis.redundancy {
        RedundancyOutcome::NoneDetected => NO_REDUNDANCY.to_string(),
        RedundancyOutcome::Detected(findings) => findings
            .iter()
            .map(|finding| {
                let tickers: Vec<&str> = finding.ticker_names().collect();
                let values = HashMap::from([
                    ("category", finding.category.clone()),
                    ("tickers", tickers.join(", ")),
                    ("weight", pct(finding.combined_weight)),
                    ("reason", finding.reason.clone()),
                ]);
                fill(FINDING, &values)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    report.push("Redundancy", redundancy);

    let mut risk_lines: Vec<String> = risk
        .scores()
        .iter()
        .map(|score| {
            let values = HashMap::from([
                ("dimension", score.dimension.to_string()),
                ("score", score.score.to_string()),
                ("label", score.label.to_string()),
                (
                    "note",
                    if score.baseline {
                        " [baseline]".to_string()
                    } else {
                        String::new()
                    },
                ),
            ]);
            fill(RISK_LINE, &values)
        })
        .collect();
    let values = HashMap::from([
        ("tech", pct(exposures.technology_concentration)),
        ("bonds", pct(exposures.bonds_concentration)),
        ("intl", pct(exposures.international_weight)),
    ]);
    risk_lines.push(fill(EXPOSURES, &values));
    report.push("Risk", risk_lines.join("\n"));

    report.push("Simplification", analysis.simplification.explanation.clone());

    if !analysis.recommendations.is_empty() {
        let mut lines = Vec::new();
        for (i, rec) in analysis.recommendations.iter().enumerate() {
            let values = HashMap::from([
                ("index", (i + 1).to_string()),
                ("title", rec.title.clone()),
                ("rationale", rec.rationale.clone()),
            ]);
            lines.push(fill(RECOMMENDATION, &values));
            for action in &rec.actions {
                let values = HashMap::from([
                    ("action", action.action.to_string()),
                    ("ticker", action.ticker.clone()),
                    ("amount", action.amount.clone()),
                ]);
                lines.push(fill(ACTION, &values));
            }
        }
        report.push("Recommendations", lines.join("\n"));
    }

    let parse = &analysis.parse;
    let mut notes = Vec::new();
    if parse.source == ParseSource::Fallback {
        notes.push("Tickers were picked out of free text; check that every holding was recognized.".to_string());
    }
    if parse.weights_imputed() {
        notes.push(format!(
            "No weight was given for {}; an equal share was assumed.",
            parse.imputed.join(", ")
        ));
    }
    for clamped in &parse.clamped {
        notes.push(format!(
            "{} weight {}% was out of range and treated as {}%.",
            clamped.ticker,
            pct(clamped.original),
            pct(clamped.clamped)
        ));
    }
    if !notes.is_empty() {
        report.push("Notes", notes.join("\n"));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;

    #[test]
    fn test_fill() {
        let values = HashMap::from([("name", "VTI".to_string())]);
        assert_eq!(fill("Keep {name}, drop {other}", &values), "Keep VTI, drop {other}");
    }

    #[test]
    fn test_report_sections() {
        let report = render_report(&analyze("FZROX 40%, VTI 30%, BND 30%").unwrap());
        let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Overview", "Redundancy", "Risk", "Simplification", "Recommendations"]
        );

        let redundancy = report.section("Redundancy").unwrap();
        assert!(redundancy.body.contains("FZROX, VTI (70.0% combined)"));
        assert!(report.section("Risk").unwrap().body.contains("Signal Quality: 5/10 (Moderate risk) [baseline]"));
        assert!(report.to_string().starts_with("OVERVIEW\nYou hold 3 positions totaling 100.0%."));
    }

    #[test]
    fn test_report_notes() {
        let report = render_report(&analyze("VTI, BND 150%").unwrap());
        let notes = report.section("Notes").unwrap();
        assert!(notes.body.contains("No weight was given for VTI"));
        assert!(notes.body.contains("BND weight 150.0% was out of range and treated as 100.0%."));
    }

    #[test]
    fn test_clean_portfolio_report() {
        let report = render_report(&analyze("SGOV 50%, VTI 50%").unwrap());
        assert_eq!(report.section("Redundancy").unwrap().body, NO_REDUNDANCY);
        assert!(report.section("Notes").is_none());
    }
}
