//! Pull request reviewer configuration.

use serde::{Deserialize, Serialize};

/// Users and teams to request reviews from once a PR is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Reviewers {
    /// GitHub user logins.
    pub users: Vec<String>,

    /// Team slugs within the repository's organization.
    pub teams: Vec<String>,
}

impl Reviewers {
    /// Returns true if neither users nor teams are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.teams.is_empty()
    }
}
