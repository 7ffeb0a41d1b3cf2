//! Configuration error types.

use crate::actions::ActionError;
use thiserror::Error;

/// Errors that can occur while loading a batch file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse batch file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the batch definition.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// An action entry could not be turned into an action.
    #[error("Invalid action #{position} in '{path}': {source}")]
    InvalidAction {
        path: String,
        position: usize,
        #[source]
        source: ActionError,
    },
}
