//! Classify command implementation.
//!
//! Shows the categories and sector assigned to each ticker.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use holdwise_portfolio::classification::ClassificationSource;
use holdwise_portfolio::Classifier;

use crate::cli::{Context, OutputFormat};
use crate::output::print_header;

/// Arguments for the classify command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Tickers to classify
    #[arg(required = true)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct ClassifyRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Source")]
    source: &'static str,
}

fn source_name(source: ClassificationSource) -> &'static str {
    match source {
        ClassificationSource::Registry => "registry",
        ClassificationSource::Heuristic => "heuristic",
        ClassificationSource::Unknown => "unknown",
    }
}

fn classify_rows(classifier: &Classifier, tickers: &[String]) -> Vec<ClassifyRow> {
    tickers
        .iter()
        .map(|ticker| {
            let classification = classifier.classify(ticker);
            ClassifyRow {
                ticker: ticker.trim().to_uppercase(),
                sector: classification.sector.to_string(),
                categories: classification
                    .categories
                    .iter()
                    .map(|c| c.tag())
                    .collect::<Vec<_>>()
                    .join(" "),
                source: source_name(classification.source),
            }
        })
        .collect()
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs, ctx: &Context) -> Result<()> {
    let rows = classify_rows(&Classifier::standard(), &args.tickers);

    match ctx.format {
        OutputFormat::Table => {
            print_header("Classification");
            crate::output::print_output(&rows, ctx.format)?;
        }
        OutputFormat::Json | OutputFormat::Csv => {
            crate::output::print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{} {}", row.ticker, row.categories);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rows() {
        let tickers = vec!["vti".to_string(), "AAPL".to_string(), "ZZZZZZ".to_string()];
        let rows = classify_rows(&Classifier::standard(), &tickers);

        assert_eq!(rows[0].ticker, "VTI");
        assert_eq!(rows[0].categories, "broad-market");
        assert_eq!(rows[0].source, "registry");

        assert_eq!(rows[1].sector, "Technology");
        assert_eq!(rows[2].source, "unknown");
        assert!(rows[2].categories.is_empty());
    }
}
