//! Workspace error types.

use thiserror::Error;

/// Errors that can occur while preparing, branching or publishing a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Creating the workspace directory or cloning failed.
    #[error("Failed to clone {repository}: {message}")]
    CloneFailed { repository: String, message: String },

    /// The branch already exists on the remote.
    #[error("Branch '{branch}' already exists on {repository}")]
    BranchExists { repository: String, branch: String },

    /// Creating or checking out the branch locally failed.
    #[error("Failed to create branch '{branch}': {message}")]
    BranchFailed { branch: String, message: String },

    /// Staging, committing or pushing failed.
    #[error("Failed to commit and push '{branch}': {message}")]
    CommitPushFailed { branch: String, message: String },
}
