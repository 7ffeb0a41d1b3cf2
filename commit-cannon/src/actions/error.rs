//! Action error types.

use thiserror::Error;

/// Errors that can occur while loading or applying an action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The file an action targets does not exist.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// No line in the target file matched the source line.
    #[error("No line equal to `{source_line}` found in {path}")]
    NoMatch { path: String, source_line: String },

    /// The action's `type` is not one of the supported kinds.
    #[error("Unknown action type '{kind}'")]
    UnknownKind { kind: String },

    /// A required field is absent or empty.
    #[error("Action '{kind}' is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A field is present but unusable.
    #[error("Action '{kind}' has invalid field '{field}': {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },

    /// The command ran and exited unsuccessfully.
    #[error("Command `{command}` failed ({status}): {stderr}")]
    ExecutionFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The shell could not be started.
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the target file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
