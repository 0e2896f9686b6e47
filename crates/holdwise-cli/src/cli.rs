//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::commands::{AnalyzeArgs, ClassifyArgs, ConfigArgs, RunsArgs};

/// Holdwise - Find overlapping funds and hidden risk in a portfolio
#[derive(Parser)]
#[command(name = "holdwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured default_format)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run database path
    #[arg(long, global = true, env = "HOLDWISE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a portfolio for overlap, risk and simplification
    Analyze(AnalyzeArgs),

    /// Show how tickers are classified
    Classify(ClassifyArgs),

    /// List, show and delete saved analysis runs
    Runs(RunsArgs),

    /// Manage configurations
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the headline values)
    Minimal,
}

/// Resolved global options passed to every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format after applying the configured default.
    pub format: OutputFormat,
    /// Suppress informational messages.
    pub quiet: bool,
    /// Run database path.
    pub db_path: PathBuf,
}
