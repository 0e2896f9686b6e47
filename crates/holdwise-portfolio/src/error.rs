//! Error types for portfolio analysis.
//!
//! The engine recovers from almost everything a user can type. The only
//! caller-visible analysis failure is [`PortfolioError::InsufficientData`];
//! configuration problems surface as [`PortfolioError::InvalidConfig`].

use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur during portfolio analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// No ticker could be recovered from the input text.
    #[error("Insufficient data: no holdings found in {input_len} characters of input")]
    InsufficientData {
        /// Length of the rejected input, in characters.
        input_len: usize,
    },

    /// Analyzer configuration failed validation.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },
}

impl PortfolioError {
    /// Create an insufficient data error for the given raw input.
    #[must_use]
    pub fn insufficient_data(input: &str) -> Self {
        Self::InsufficientData {
            input_len: input.chars().count(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns true if the caller should prompt the user for holdings.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortfolioError::insufficient_data("my retirement money");
        assert!(err.to_string().contains("no holdings"));
        assert!(err.to_string().contains("19"));
        assert!(err.is_insufficient_data());

        let err = PortfolioError::invalid_config("max_recommendations must be positive");
        assert!(err.to_string().contains("max_recommendations"));
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn test_error_clone() {
        let err = PortfolioError::insufficient_data("");
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
