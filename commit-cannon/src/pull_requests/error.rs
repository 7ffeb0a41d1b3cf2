//! Pull request error types.

use thiserror::Error;

/// Errors that can occur while publishing a pull request.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The API answered with an unexpected status.
    #[error("GitHub rejected {operation} with status {status}: {message}")]
    RemoteRejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The API answered successfully but the payload lacks required fields.
    #[error("Malformed response to {operation}: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    /// No API token was provided.
    #[error("GitHub token not set; export {var}")]
    MissingToken { var: &'static str },

    /// The request could not be sent or the response could not be read.
    #[error("GitHub API error: {0}")]
    Transport(#[from] octocrab::Error),
}
