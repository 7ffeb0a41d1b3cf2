//! Target repository descriptors.

use serde::{Deserialize, Serialize};

/// Base branch used when a repository does not override it.
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// A repository the batch is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryDescriptor {
    /// Full repository name in "owner/name" format.
    pub name: String,

    /// Branch to start from and open the PR against (defaults to "master").
    pub base: Option<String>,
}

impl RepositoryDescriptor {
    /// Returns the base branch override, or [`DEFAULT_BASE_BRANCH`].
    #[must_use]
    pub fn base_branch(&self) -> &str {
        self.base.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    /// Returns the owner part of the name.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.name.split_once('/').map_or("", |(owner, _)| owner)
    }

    /// Returns the repository part of the name.
    #[must_use]
    pub fn repo(&self) -> &str {
        self.name.split_once('/').map_or(&self.name, |(_, repo)| repo)
    }
}
