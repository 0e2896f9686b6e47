//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// No holdings text was supplied.
    #[error("No holdings given. Pass text, --file <PATH>, or pipe holdings on stdin.")]
    MissingInput,

    /// Invalid investor profile.
    #[error("Invalid profile: {0}. Use growth, balanced, or retirement.")]
    InvalidProfile(String),

    /// Invalid output format.
    #[error("Invalid format: {0}. Use table, json, csv, or minimal.")]
    InvalidFormat(String),

    /// Unknown configuration key.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Configuration key.
        key: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// Engine configuration file could not be used.
    #[error("Invalid engine config {path}: {reason}")]
    EngineConfig {
        /// File path.
        path: String,
        /// Parse or validation failure.
        reason: String,
    },

    /// Configuration directory could not be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
