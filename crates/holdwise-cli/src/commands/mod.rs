//! CLI command implementations.

pub mod analyze;
pub mod classify;
pub mod config;
pub mod runs;

// Re-export submodules for convenience
pub use analyze::AnalyzeArgs;
pub use classify::ClassifyArgs;
pub use config::ConfigArgs;
pub use runs::RunsArgs;

use holdwise_portfolio::InvestorProfile;
use holdwise_storage::RedbStorage;

use crate::cli::Context;
use crate::error::{CliError, CliResult};

/// Parses an investor profile name.
pub fn parse_profile(s: &str) -> CliResult<InvestorProfile> {
    s.parse()
        .map_err(|_| CliError::InvalidProfile(s.to_string()))
}

/// Opens the run database configured for this invocation.
pub fn open_store(ctx: &Context) -> anyhow::Result<RedbStorage> {
    tracing::debug!(path = %ctx.db_path.display(), "opening run database");
    Ok(RedbStorage::open(&ctx.db_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        assert_eq!(parse_profile("Growth").unwrap(), InvestorProfile::Growth);
        assert!(matches!(
            parse_profile("aggressive"),
            Err(CliError::InvalidProfile(p)) if p == "aggressive"
        ));
    }
}
