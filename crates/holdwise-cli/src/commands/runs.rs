//! Runs command implementation.
//!
//! Lists, shows and deletes saved analysis runs.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use holdwise_storage::{AnalysisStore, RunFilter, RunSummary};

use crate::cli::{Context, OutputFormat};
use crate::commands::analyze::print_analysis;
use crate::commands::open_store;
use crate::output::{print_header, print_info, print_success, KeyValue};

/// Arguments for the runs command.
#[derive(Args, Debug)]
pub struct RunsArgs {
    #[command(subcommand)]
    pub command: RunsCommand,
}

/// Runs subcommands.
#[derive(Subcommand, Debug)]
pub enum RunsCommand {
    /// List saved runs, newest first
    List(ListArgs),

    /// Show one saved run
    Show(ShowArgs),

    /// Delete a saved run
    Delete(DeleteArgs),

    /// Show run database statistics
    Stats,
}

/// Arguments for list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only runs holding this ticker
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Maximum number of runs
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Run id or unique prefix
    pub id: String,

    /// Print the narrative report
    #[arg(short, long)]
    pub report: bool,
}

/// Arguments for delete subcommand.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Run id or unique prefix
    pub id: String,
}

#[derive(Debug, Serialize, Tabled)]
struct RunRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Holdings")]
    holdings: usize,
    #[tabled(rename = "Findings")]
    findings: usize,
    #[tabled(rename = "Risk")]
    risk: u8,
    #[tabled(rename = "Simplification")]
    simplification: String,
}

impl From<&RunSummary> for RunRow {
    fn from(summary: &RunSummary) -> Self {
        Self {
            id: summary.run_id.short(),
            created: summary.created_at.format("%Y-%m-%d %H:%M").to_string(),
            label: summary.label.clone().unwrap_or_default(),
            holdings: summary.holdings,
            findings: summary.findings,
            risk: summary.overall_risk_score,
            simplification: format!("{:.1}", summary.simplification),
        }
    }
}

/// Execute the runs command.
pub fn execute(args: RunsArgs, ctx: &Context) -> Result<()> {
    let store = open_store(ctx)?;
    match args.command {
        RunsCommand::List(list_args) => execute_list(&store, list_args, ctx),
        RunsCommand::Show(show_args) => execute_show(&store, show_args, ctx),
        RunsCommand::Delete(delete_args) => execute_delete(&store, delete_args, ctx),
        RunsCommand::Stats => execute_stats(&store, ctx),
    }
}

fn execute_list(store: &dyn AnalysisStore, args: ListArgs, ctx: &Context) -> Result<()> {
    let mut filter = RunFilter::new().limit(args.limit);
    if let Some(ticker) = args.ticker {
        filter = filter.ticker(ticker);
    }
    let summaries: Vec<RunSummary> = store
        .list(Some(&filter))?
        .iter()
        .map(|r| r.summary())
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            if summaries.is_empty() {
                print_info("No saved runs.");
                return Ok(());
            }
            print_header("Saved Runs");
            let rows: Vec<RunRow> = summaries.iter().map(RunRow::from).collect();
            crate::output::print_output(&rows, ctx.format)?;
        }
        OutputFormat::Json => crate::output::print_json_value(&summaries)?,
        OutputFormat::Csv => {
            let rows: Vec<RunRow> = summaries.iter().map(RunRow::from).collect();
            crate::output::print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => {
            for summary in &summaries {
                println!("{}", summary.run_id);
            }
        }
    }
    Ok(())
}

fn execute_show(store: &dyn AnalysisStore, args: ShowArgs, ctx: &Context) -> Result<()> {
    let run_id = store.resolve(&args.id)?;
    let record = store.require(&run_id)?;

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!("Run {}", record.run_id));
            let details = vec![
                KeyValue::new("Created", record.created_at.to_rfc3339()),
                KeyValue::new("Label", record.label.clone().unwrap_or_default()),
                KeyValue::new("Profile", record.profile.to_string()),
                KeyValue::new("Input", record.input.trim().replace('\n', ", ")),
            ];
            crate::output::print_output(&details, ctx.format)?;
            print_analysis(&record.analysis, args.report)?;
        }
        OutputFormat::Json => crate::output::print_json_value(&record)?,
        OutputFormat::Csv => {
            crate::output::print_output(&[RunRow::from(&record.summary())], ctx.format)?;
        }
        OutputFormat::Minimal => println!("{}", record.input.trim()),
    }
    Ok(())
}

fn execute_delete(store: &dyn AnalysisStore, args: DeleteArgs, ctx: &Context) -> Result<()> {
    let run_id = store.resolve(&args.id)?;
    store.require(&run_id)?;
    store.delete(&run_id)?;
    if !ctx.quiet {
        print_success(&format!("Deleted run {}", run_id));
    }
    Ok(())
}

fn execute_stats(store: &dyn AnalysisStore, ctx: &Context) -> Result<()> {
    let stats = store.stats()?;
    match ctx.format {
        OutputFormat::Json => crate::output::print_json_value(&stats)?,
        OutputFormat::Minimal => println!("{}", stats.run_count),
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = vec![
                KeyValue::new("Backend", store.backend_name()),
                KeyValue::new("Path", ctx.db_path.display().to_string()),
                KeyValue::new("Runs", stats.run_count.to_string()),
                KeyValue::new("Payload Bytes", stats.payload_bytes.to_string()),
                KeyValue::new(
                    "File Size",
                    stats
                        .file_size_bytes
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ];
            if ctx.format == OutputFormat::Table {
                print_header("Run Database");
            }
            crate::output::print_output(&rows, ctx.format)?;
        }
    }
    Ok(())
}
