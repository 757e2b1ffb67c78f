//! Error types for chain-core.
//!
//! The composition layer never rewraps errors: whatever a unit returns is
//! handed to the caller of `invoke`, `batch` or `stream` unchanged.

use thiserror::Error;

/// Result type alias for chain-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error carried as the cause of an [`Error::Execution`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for chain-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed composition, such as positional options whose length does
    /// not match the batch inputs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the collaborator behind a runnable.
    #[error("Execution error: {message}")]
    Execution {
        /// Human readable description.
        message: String,
        /// The original cause, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// Two values of incompatible variants were concatenated strictly.
    #[error("Cannot concatenate {left} with {right}")]
    Concatenation {
        /// Variant name of the left operand.
        left: String,
        /// Variant name of the right operand.
        right: String,
    },

    /// Error parsing JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an execution error without an underlying cause.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            source: None,
        }
    }

    /// Create an execution error wrapping the collaborator's own error.
    pub fn execution_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Execution {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a concatenation error.
    pub fn concatenation(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Concatenation {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}
