//! Config command implementation.
//!
//! Manages CLI configuration settings.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use holdwise_portfolio::InvestorProfile;

use crate::cli::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_success, print_warning, KeyValue};

/// Overrides the config directory (used by tests and sandboxed installs).
pub const CONFIG_DIR_ENV: &str = "HOLDWISE_CONFIG_DIR";

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Default output format
    DefaultFormat,
    /// Default investor profile
    DefaultProfile,
    /// Run database location
    DatabasePath,
    /// Cap on recommendations per analysis
    MaxRecommendations,
    /// Whether to use colors
    UseColors,
}

impl FromStr for ConfigKey {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default_format" | "format" => Ok(Self::DefaultFormat),
            "default_profile" | "profile" => Ok(Self::DefaultProfile),
            "db_path" | "db" => Ok(Self::DatabasePath),
            "max_recommendations" | "max" => Ok(Self::MaxRecommendations),
            "use_colors" | "colors" => Ok(Self::UseColors),
            _ => Err(CliError::UnknownKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "default_format",
            Self::DefaultProfile => "default_profile",
            Self::DatabasePath => "db_path",
            Self::MaxRecommendations => "max_recommendations",
            Self::UseColors => "use_colors",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "Default output format (table, json, csv, minimal)",
            Self::DefaultProfile => "Investor profile (growth, balanced, retirement)",
            Self::DatabasePath => "Run database file (empty: platform data dir)",
            Self::MaxRecommendations => "Maximum recommendations per analysis (1-20)",
            Self::UseColors => "Enable colored output (true, false)",
        }
    }

    fn default_value(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "table",
            Self::DefaultProfile => "balanced",
            Self::DatabasePath => "",
            Self::MaxRecommendations => "6",
            Self::UseColors => "true",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DefaultFormat,
            Self::DefaultProfile,
            Self::DatabasePath,
            Self::MaxRecommendations,
            Self::UseColors,
        ]
    }

    /// Validates a value for this key.
    fn validate(&self, value: &str) -> CliResult<()> {
        let invalid = |reason: String| CliError::InvalidValue {
            key: self.as_str(),
            reason,
        };
        match self {
            Self::DefaultFormat => parse_format(value).map(|_| ()),
            Self::DefaultProfile => InvestorProfile::from_str(value)
                .map(|_| ())
                .map_err(|_| CliError::InvalidProfile(value.to_string())),
            Self::DatabasePath => Ok(()),
            Self::MaxRecommendations => {
                let max: usize = value
                    .parse()
                    .map_err(|_| invalid(format!("{value} is not a number")))?;
                if !(1..=20).contains(&max) {
                    return Err(invalid(format!("{max} must be between 1 and 20")));
                }
                Ok(())
            }
            Self::UseColors => parse_bool(value)
                .map(|_| ())
                .ok_or_else(|| invalid(format!("{value} is not a boolean. Use true or false."))),
        }
    }
}

fn parse_format(value: &str) -> CliResult<OutputFormat> {
    match value.to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        "minimal" => Ok(OutputFormat::Minimal),
        _ => Err(CliError::InvalidFormat(value.to_string())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Simple config storage.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Config {
    /// Loads the config file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn value(&self, key: ConfigKey) -> &str {
        self.values
            .get(key.as_str())
            .map(String::as_str)
            .unwrap_or(key.default_value())
    }

    fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    /// Configured default output format.
    pub fn format(&self) -> OutputFormat {
        parse_format(self.value(ConfigKey::DefaultFormat)).unwrap_or_default()
    }

    /// Configured investor profile.
    pub fn profile(&self) -> InvestorProfile {
        self.value(ConfigKey::DefaultProfile).parse().unwrap_or_default()
    }

    /// Configured recommendation cap.
    pub fn max_recommendations(&self) -> Option<usize> {
        self.values
            .get(ConfigKey::MaxRecommendations.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Whether colored output is enabled.
    pub fn use_colors(&self) -> bool {
        parse_bool(self.value(ConfigKey::UseColors)).unwrap_or(true)
    }

    /// Run database path: configured value, else the platform data dir.
    pub fn db_path(&self) -> Result<PathBuf> {
        let configured = self.value(ConfigKey::DatabasePath);
        if !configured.is_empty() {
            return Ok(PathBuf::from(configured));
        }
        let base = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .or_else(dirs::home_dir)
                .ok_or(CliError::NoConfigDir)?
                .join("holdwise"),
        };
        Ok(base.join("runs.redb"))
    }
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join("config.json"));
    }
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or(CliError::NoConfigDir)?;
    Ok(home.join("holdwise").join("config.json"))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx.format),
        ConfigCommand::Get(get_args) => execute_get(get_args, ctx.format),
        ConfigCommand::Set(set_args) => execute_set(set_args),
        ConfigCommand::List => execute_list(ctx.format),
        ConfigCommand::Reset(reset_args) => execute_reset(reset_args),
        ConfigCommand::Path => execute_path(),
    }
}

/// Show current configuration.
fn execute_show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| KeyValue::new(key.as_str(), config.value(*key)))
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: BTreeMap<&str, &str> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), config.value(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Minimal => {
            for kv in &results {
                println!("{}={}", kv.key, kv.value);
            }
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(args: GetArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let key: ConfigKey = args.key.parse()?;
    let value = config.value(key);

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}: {}", key.as_str(), value);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(args: SetArgs) -> Result<()> {
    let key: ConfigKey = args.key.parse()?;
    key.validate(&args.value)?;

    let mut config = Config::load()?;
    config.set(key.as_str().to_string(), args.value.clone());
    config.save()?;

    print_success(&format!("Set {} = {}", key.as_str(), args.value));
    Ok(())
}

/// List available configuration keys.
fn execute_list(format: OutputFormat) -> Result<()> {
    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| {
            KeyValue::new(
                key.as_str(),
                format!("{} (default: {})", key.description(), key.default_value()),
            )
        })
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Available Configuration Keys");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(args: ResetArgs) -> Result<()> {
    let mut config = Config::load()?;

    if args.all {
        config.clear();
        config.save()?;
        print_success("Reset all configuration to defaults");
    } else if let Some(key_str) = args.key {
        let key: ConfigKey = key_str.parse()?;
        config.remove(key.as_str());
        config.save()?;
        print_success(&format!(
            "Reset {} to default ({})",
            key.as_str(),
            key.default_value()
        ));
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path() -> Result<()> {
    let path = config_path()?;
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_aliases() {
        assert_eq!("format".parse::<ConfigKey>().unwrap(), ConfigKey::DefaultFormat);
        assert_eq!("PROFILE".parse::<ConfigKey>().unwrap(), ConfigKey::DefaultProfile);
        assert!(matches!(
            "daycount".parse::<ConfigKey>(),
            Err(CliError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_validate_values() {
        assert!(ConfigKey::DefaultFormat.validate("JSON").is_ok());
        assert!(ConfigKey::DefaultFormat.validate("yaml").is_err());
        assert!(ConfigKey::DefaultProfile.validate("retirement").is_ok());
        assert!(matches!(
            ConfigKey::DefaultProfile.validate("yolo"),
            Err(CliError::InvalidProfile(_))
        ));
        assert!(ConfigKey::MaxRecommendations.validate("3").is_ok());
        assert!(ConfigKey::MaxRecommendations.validate("0").is_err());
        assert!(ConfigKey::UseColors.validate("no").is_ok());
        assert!(ConfigKey::UseColors.validate("maybe").is_err());
    }

    #[test]
    fn test_typed_accessors() {
        let mut config = Config::default();
        assert_eq!(config.format(), OutputFormat::Table);
        assert_eq!(config.profile(), InvestorProfile::Balanced);
        assert!(config.use_colors());
        assert_eq!(config.max_recommendations(), None);

        config.set("default_format".into(), "csv".into());
        config.set("default_profile".into(), "growth".into());
        config.set("use_colors".into(), "false".into());
        config.set("max_recommendations".into(), "4".into());
        config.set("db_path".into(), "/tmp/runs.redb".into());

        assert_eq!(config.format(), OutputFormat::Csv);
        assert_eq!(config.profile(), InvestorProfile::Growth);
        assert!(!config.use_colors());
        assert_eq!(config.max_recommendations(), Some(4));
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/runs.redb"));
    }
}
