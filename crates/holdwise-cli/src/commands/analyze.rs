//! Analyze command implementation.
//!
//! Runs the full portfolio analysis on holdings text.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use holdwise_portfolio::{
    render_report, AnalyzerConfig, InvestorProfile, ParseSource, PortfolioAnalysis,
    PortfolioAnalyzer, RedundancyOutcome, Report, TradeAction,
};
use holdwise_storage::{AnalysisRecord, AnalysisStore, RunId};

use crate::cli::{Context, OutputFormat};
use crate::commands::config::Config;
use crate::commands::{open_store, parse_profile};
use crate::error::{CliError, CliResult};
use crate::output::{format_percent, print_header, print_info, print_success, print_warning, risk_label, KeyValue};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Holdings text, e.g. "VTI 60%, BND 40%"
    #[arg(conflicts_with = "file")]
    pub holdings: Option<String>,

    /// Read holdings from a file ("-" for stdin)
    #[arg(short = 'i', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Investor profile: growth, balanced, retirement
    #[arg(short, long, value_parser = parse_profile)]
    pub profile: Option<InvestorProfile>,

    /// Engine configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub engine_config: Option<PathBuf>,

    /// Maximum number of recommendations
    #[arg(long)]
    pub max_recommendations: Option<usize>,

    /// Save the run to the run database
    #[arg(short, long)]
    pub save: bool,

    /// Label for the saved run
    #[arg(long, requires = "save")]
    pub label: Option<String>,

    /// Print the narrative report
    #[arg(short, long)]
    pub report: bool,
}

#[derive(Serialize, Tabled)]
struct HoldingRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Categories")]
    categories: String,
}

#[derive(Serialize, Tabled)]
struct FindingRow {
    #[tabled(rename = "Overlap")]
    category: String,
    #[tabled(rename = "Tickers")]
    tickers: String,
    #[tabled(rename = "Combined")]
    combined: String,
}

#[derive(Serialize, Tabled)]
struct RiskRow {
    #[tabled(rename = "Dimension")]
    dimension: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Level")]
    level: String,
}

/// JSON shape of an analyze result.
#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<RunId>,
    analysis: &'a PortfolioAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<Report>,
}

/// Execute the analyze command.
pub fn execute(args: AnalyzeArgs, ctx: &Context) -> Result<()> {
    let settings = Config::load()?;
    let text = read_holdings(&args)?;
    let config = engine_config(&args, &settings)?;
    let profile = config.profile;

    let analyzer = PortfolioAnalyzer::new(config)?;
    let analysis = analyzer.analyze(&text)?;

    let run_id = if args.save {
        let mut record = AnalysisRecord::new(text, analysis.clone()).with_profile(profile);
        if let Some(label) = args.label {
            record = record.with_label(label);
        }
        let store = open_store(ctx)?;
        store.put(&record)?;
        Some(record.run_id)
    } else {
        None
    };

    match ctx.format {
        OutputFormat::Table => {
            print_analysis(&analysis, args.report)?;
            if let Some(id) = run_id {
                if !ctx.quiet {
                    print_success(&format!("Saved run {}", id));
                }
            }
        }
        OutputFormat::Json => {
            let output = AnalyzeOutput {
                run_id,
                analysis: &analysis,
                report: args.report.then(|| render_report(&analysis)),
            };
            crate::output::print_json_value(&output)?;
        }
        OutputFormat::Csv => {
            crate::output::print_output(&summary_rows(&analysis), ctx.format)?;
        }
        OutputFormat::Minimal => {
            println!(
                "risk={} simplification={:.1} findings={} recommendations={}",
                analysis.risk.overall_risk_score,
                analysis.simplification.score,
                analysis.redundancy.len(),
                analysis.recommendations.len()
            );
        }
    }

    Ok(())
}

/// Reads holdings from the positional argument, a file, or stdin.
fn read_holdings(args: &AnalyzeArgs) -> CliResult<String> {
    if let Some(ref text) = args.holdings {
        return Ok(text.clone());
    }
    match args.file {
        Some(ref path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let stdin = std::io::stdin();
            if args.file.is_none() && stdin.is_terminal() {
                return Err(CliError::MissingInput);
            }
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Builds the engine config: TOML file, then user settings, then flags.
fn engine_config(args: &AnalyzeArgs, settings: &Config) -> Result<AnalyzerConfig> {
    let mut config = match args.engine_config {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<AnalyzerConfig>(&content).map_err(|e| CliError::EngineConfig {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => AnalyzerConfig::default().with_profile(settings.profile()),
    };

    if args.engine_config.is_none() {
        if let Some(max) = settings.max_recommendations() {
            config = config.with_max_recommendations(max);
        }
    }
    if let Some(profile) = args.profile {
        config = config.with_profile(profile);
    }
    if let Some(max) = args.max_recommendations {
        config = config.with_max_recommendations(max);
    }
    tracing::debug!(profile = %config.profile, "engine config resolved");
    Ok(config)
}

fn summary_rows(analysis: &PortfolioAnalysis) -> Vec<KeyValue> {
    let risk = &analysis.risk;
    let exposures = &risk.exposures;
    let mut rows = vec![
        KeyValue::new("Holdings", analysis.holdings.len().to_string()),
        KeyValue::new("Findings", analysis.redundancy.len().to_string()),
    ];
    rows.extend(
        risk.scores()
            .iter()
            .map(|s| KeyValue::from_score(s.dimension.name(), s.score)),
    );
    rows.extend([
        KeyValue::from_score("Overall Risk", risk.overall_risk_score),
        KeyValue::from_score("Simplification", format!("{:.1}", analysis.simplification.score)),
        KeyValue::from_percent("Technology", exposures.technology_concentration),
        KeyValue::from_percent("Bonds", exposures.bonds_concentration),
        KeyValue::from_percent("International", exposures.international_weight),
        KeyValue::from_percent("Individual Stocks", exposures.individual_stock_weight),
        KeyValue::new("Recommendations", analysis.recommendations.len().to_string()),
    ]);
    rows
}

/// Prints an analysis in table form, or its narrative report.
pub fn print_analysis(analysis: &PortfolioAnalysis, report: bool) -> Result<()> {
    if report {
        println!("{}", render_report(analysis));
        return Ok(());
    }

    print_header("Holdings");
    let holdings: Vec<HoldingRow> = analysis
        .holdings
        .iter()
        .map(|h| HoldingRow {
            ticker: h.ticker.clone(),
            weight: format_percent(h.weight),
            sector: h.sector.to_string(),
            categories: h
                .categories
                .iter()
                .map(|c| c.tag())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    crate::output::print_output(&holdings, OutputFormat::Table)?;

    print_header("Redundancy");
    match &analysis.redundancy {
        RedundancyOutcome::NoneDetected => print_info("No overlapping holdings found"),
        RedundancyOutcome::Detected(findings) => {
            let rows: Vec<FindingRow> = findings
                .iter()
                .map(|f| FindingRow {
                    category: f.category.clone(),
                    tickers: f.ticker_names().collect::<Vec<_>>().join(", "),
                    combined: format_percent(f.combined_weight),
                })
                .collect();
            crate::output::print_output(&rows, OutputFormat::Table)?;
            for finding in findings {
                println!("  {} {}", "•".dimmed(), finding.reason);
            }
        }
    }

    print_header("Risk");
    let risk = &analysis.risk;
    let rows: Vec<RiskRow> = risk
        .scores()
        .iter()
        .map(|s| RiskRow {
            dimension: s.dimension.to_string(),
            score: format!("{}/10", s.score),
            level: if s.baseline {
                format!("{} (baseline)", s.label)
            } else {
                s.label.to_string()
            },
        })
        .collect();
    crate::output::print_output(&rows, OutputFormat::Table)?;
    println!(
        "Overall: {}/10 {}",
        risk.overall_risk_score,
        risk_label(risk.overall_label)
    );

    print_header("Simplification");
    println!("{:.1}/10  {}", analysis.simplification.score, analysis.simplification.explanation);

    if !analysis.recommendations.is_empty() {
        print_header("Recommendations");
        for (i, rec) in analysis.recommendations.iter().enumerate() {
            println!("{}. {}", i + 1, rec.title.bold());
            println!("   {}", rec.rationale);
            for action in &rec.actions {
                let verb = match action.action {
                    TradeAction::Sell => action.action.to_string().red(),
                    TradeAction::Buy => action.action.to_string().green(),
                };
                println!("   {} {}: {}", verb, action.ticker, action.amount);
            }
        }
    }

    let parse = &analysis.parse;
    if parse.source == ParseSource::Fallback {
        print_warning("Tickers were picked out of free text; check that every holding was recognized.");
    }
    if parse.weights_imputed() {
        print_warning(&format!(
            "No weight given for {}; assumed an equal share.",
            parse.imputed.join(", ")
        ));
    }
    for clamped in &parse.clamped {
        print_warning(&format!(
            "{} weight {} clamped to {}",
            clamped.ticker,
            format_percent(clamped.original),
            format_percent(clamped.clamped)
        ));
    }

    Ok(())
}
