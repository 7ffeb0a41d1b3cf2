//! Pull request request/response types.

use crate::config::Reviewers;
use serde::{Deserialize, Serialize};

/// Everything needed to open one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRequest {
    /// Repository full name ("owner/repo").
    pub repository: String,

    /// Branch the PR merges into.
    pub base: String,

    /// PR title.
    pub title: String,

    /// Branch holding the changes.
    pub head: String,

    /// Rendered PR description.
    pub body: String,
}

/// A created pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrResult {
    /// Web URL of the PR.
    pub url: String,

    /// PR number within the repository.
    pub number: u64,
}

/// Body of `POST /repos/{repo}/pulls`.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePullBody<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a PrRequest> for CreatePullBody<'a> {
    fn from(request: &'a PrRequest) -> Self {
        Self {
            title: &request.title,
            head: &request.head,
            base: &request.base,
            body: &request.body,
        }
    }
}

/// Fields read back from a created pull request.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedPull {
    pub html_url: Option<String>,
    pub number: Option<u64>,
}

/// Body of `POST /repos/{repo}/pulls/{number}/requested_reviewers`.
///
/// Empty categories are left out of the payload entirely.
#[derive(Debug, Serialize)]
pub(crate) struct RequestReviewersBody {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_reviewers: Vec<String>,
}

impl From<&Reviewers> for RequestReviewersBody {
    fn from(reviewers: &Reviewers) -> Self {
        Self {
            reviewers: reviewers.users.clone(),
            team_reviewers: reviewers.teams.clone(),
        }
    }
}
