//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// The binary was built without a required feature
    #[error("Feature '{feature}' is not enabled. Rebuild with --features {feature}")]
    FeatureDisabled {
        /// Cargo feature name
        feature: &'static str,
    },

    /// Some scenarios or checks failed
    #[error("{failed} of {total} {suite} checks failed")]
    SuiteFailed {
        /// Suite name
        suite: String,
        /// Failed count
        failed: usize,
        /// Total count
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// shopcheck library error
    #[error(transparent)]
    Shop(#[from] shopcheck::ShopError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a feature-disabled error
    #[must_use]
    pub const fn feature_disabled(feature: &'static str) -> Self {
        Self::FeatureDisabled { feature }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_feature_disabled_error() {
        let err = CliError::feature_disabled("browser");
        assert_eq!(
            err.to_string(),
            "Feature 'browser' is not enabled. Rebuild with --features browser"
        );
    }

    #[test]
    fn test_suite_failed_error() {
        let err = CliError::SuiteFailed {
            suite: "ui".into(),
            failed: 2,
            total: 6,
        };
        assert_eq!(err.to_string(), "2 of 6 ui checks failed");
    }

    #[test]
    fn test_shop_error_is_transparent() {
        let err: CliError = shopcheck::ShopError::config("no users").into();
        assert_eq!(err.to_string(), "Configuration error: no users");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }
}
