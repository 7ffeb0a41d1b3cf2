//! Per-repository outcome types.

use crate::pull_requests::PrResult;
use serde::Serialize;
use std::fmt;

/// Pipeline step a repository failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Cloning the repository.
    Prepare,
    /// Creating the branch.
    Branch,
    /// Applying actions (no action succeeded).
    Actions,
    /// Committing or pushing.
    Commit,
    /// Opening the pull request.
    PullRequest,
}

impl Stage {
    /// Returns the stage name, identical to its serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Branch => "branch",
            Self::Actions => "actions",
            Self::Commit => "commit",
            Self::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepositoryOutcome {
    /// Every action applied and the PR was opened.
    Success {
        /// The created PR.
        pr: PrResult,
        /// Non-fatal problems after the PR was created (e.g. reviewer requests).
        warnings: Vec<String>,
    },

    /// Some actions applied before one failed; the applied part was published.
    PartialSuccess {
        /// The created PR.
        pr: PrResult,
        /// Action failures that stopped the sequence.
        errors: Vec<String>,
        /// Non-fatal problems after the PR was created.
        warnings: Vec<String>,
    },

    /// Processing stopped before a PR could be opened.
    Failed {
        /// Step that failed.
        stage: Stage,
        /// Error message.
        error: String,
    },

    /// The actions left the repository unchanged; nothing was published.
    SkippedNoChanges,
}

impl RepositoryOutcome {
    /// Builds a failed outcome from any error.
    pub fn failed(stage: Stage, error: impl fmt::Display) -> Self {
        Self::Failed {
            stage,
            error: error.to_string(),
        }
    }

    /// Returns the created PR, if any.
    #[must_use]
    pub fn pr(&self) -> Option<&PrResult> {
        match self {
            Self::Success { pr, .. } | Self::PartialSuccess { pr, .. } => Some(pr),
            _ => None,
        }
    }

    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::PartialSuccess { .. } => "partial",
            Self::Failed { .. } => "failed",
            Self::SkippedNoChanges => "skipped",
        }
    }
}

/// Outcome of one repository, keyed by its full name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryResult {
    /// Repository full name.
    pub repository: String,

    /// What happened.
    pub outcome: RepositoryOutcome,
}
