//! Holdwise CLI - Command-line interface for portfolio overlap and risk analysis.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a portfolio
//! holdwise analyze "FZROX 40%, VTI 30%, BND 30%"
//!
//! # Read holdings from a file and save the run
//! holdwise analyze --file holdings.txt --save --label ira
//!
//! # See how tickers are classified
//! holdwise classify XLK AAPL BND
//!
//! # Browse saved runs
//! holdwise runs list
//! holdwise runs show 3f2a
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands, Context};
use commands::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr so JSON and CSV output stay clean
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Config::load()?;
    if !settings.use_colors() {
        colored::control::set_override(false);
    }

    let ctx = Context {
        format: cli.format.unwrap_or_else(|| settings.format()),
        quiet: cli.quiet,
        db_path: match cli.db {
            Some(path) => path,
            None => settings.db_path()?,
        },
    };

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx)?,
        Commands::Classify(args) => commands::classify::execute(args, &ctx)?,
        Commands::Runs(args) => commands::runs::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
