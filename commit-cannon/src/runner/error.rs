//! Runner error types.

/// Errors that abort a run before any repository is processed.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Batch file loading and validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub client initialization errors.
    #[error(transparent)]
    Publish(#[from] crate::pull_requests::PublishError),
}
