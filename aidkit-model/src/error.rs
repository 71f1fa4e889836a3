//! Error types for the `aidkit-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a language model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The language capability is unreachable or refused the request.
    #[error("Generation unavailable ({provider}): {message}")]
    GenerationUnavailable {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The provider responded, but not with usable text.
    #[error("Invalid model response ({provider}): {message}")]
    InvalidResponse {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
