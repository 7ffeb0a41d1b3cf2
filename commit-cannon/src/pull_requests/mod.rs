//! Pull request creation and reviewer assignment.
//!
//! The [`Publisher`] trait is the code-hosting capability the runner depends
//! on; [`GitHubPublisher`] implements it against the GitHub REST API.

mod error;
mod request;

pub use error::PublishError;
pub use request::{PrRequest, PrResult};

use crate::config::Reviewers;
use http::header::{ACCEPT, AUTHORIZATION};
use http::StatusCode;
use octocrab::Octocrab;
use request::{CreatePullBody, CreatedPull, RequestReviewersBody};
use tracing::{debug, info, info_span, Instrument};

/// Environment variable the API token is read from.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub web host used for links shown to the operator.
pub const GITHUB_WEB_URL: &str = "https://github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Returns the page for opening a PR from `branch` by hand.
///
/// Reported when the branch was pushed but the API refused to open the PR.
#[must_use]
pub fn manual_pr_url(repository: &str, branch: &str) -> String {
    format!("{GITHUB_WEB_URL}/{repository}/pull/new/{branch}")
}

/// Opens pull requests and requests reviews on a code-hosting service.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Opens a pull request.
    async fn create_pr(&self, request: &PrRequest) -> Result<PrResult, PublishError>;

    /// Requests reviews on an existing pull request; no-op when `reviewers` is empty.
    async fn add_reviewers(
        &self,
        repository: &str,
        number: u64,
        reviewers: &Reviewers,
    ) -> Result<(), PublishError>;
}

/// [`Publisher`] for the GitHub REST API.
#[derive(Clone)]
pub struct GitHubPublisher {
    octocrab: Octocrab,
}

impl GitHubPublisher {
    /// Builds a publisher talking to `api_url`, authenticating with `token`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_url` is not a valid URI or the client cannot be built.
    pub fn new(api_url: &str, token: &str) -> Result<Self, PublishError> {
        let octocrab = Octocrab::builder()
            .base_uri(api_url)?
            .add_header(AUTHORIZATION, format!("token {token}"))
            .add_header(ACCEPT, GITHUB_MEDIA_TYPE.to_string())
            .build()?;
        Ok(Self { octocrab })
    }

    /// Builds a publisher using the token from [`TOKEN_ENV_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::MissingToken`] if the variable is unset or empty.
    pub fn from_env(api_url: &str) -> Result<Self, PublishError> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(PublishError::MissingToken { var: TOKEN_ENV_VAR })?;
        Self::new(api_url, &token)
    }

    /// Sends a POST and returns the status with the raw response body.
    async fn post<B: serde::Serialize>(
        &self,
        route: String,
        body: &B,
    ) -> Result<(StatusCode, String), PublishError> {
        let response = self.octocrab._post(route, Some(body)).await?;
        let status = response.status();
        let text = self.octocrab.body_to_string(response).await?;
        Ok((status, text))
    }
}

impl std::fmt::Debug for GitHubPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubPublisher").finish_non_exhaustive()
    }
}

impl Publisher for GitHubPublisher {
    async fn create_pr(&self, request: &PrRequest) -> Result<PrResult, PublishError> {
        const OPERATION: &str = "pull request creation";

        let span = info_span!(
            "create_pr",
            repo = %request.repository,
            head = %request.head,
            base = %request.base
        );

        async {
            debug!("Creating pull request");

            let route = format!("/repos/{}/pulls", request.repository);
            let (status, text) = self.post(route, &CreatePullBody::from(request)).await?;

            if status != StatusCode::CREATED {
                return Err(PublishError::RemoteRejected {
                    operation: OPERATION,
                    status: status.as_u16(),
                    message: text,
                });
            }

            let created: CreatedPull =
                serde_json::from_str(&text).map_err(|e| PublishError::MalformedResponse {
                    operation: OPERATION,
                    message: e.to_string(),
                })?;

            let (Some(url), Some(number)) = (created.html_url, created.number) else {
                return Err(PublishError::MalformedResponse {
                    operation: OPERATION,
                    message: "response is missing `html_url` or `number`".to_string(),
                });
            };

            info!(pr_number = number, url = %url, "PR created successfully");
            Ok(PrResult { url, number })
        }
        .instrument(span)
        .await
    }

    async fn add_reviewers(
        &self,
        repository: &str,
        number: u64,
        reviewers: &Reviewers,
    ) -> Result<(), PublishError> {
        if reviewers.is_empty() {
            return Ok(());
        }

        debug!(
            repo = repository,
            pr_number = number,
            users = reviewers.users.len(),
            teams = reviewers.teams.len(),
            "Requesting reviewers"
        );

        let route = format!("/repos/{repository}/pulls/{number}/requested_reviewers");
        let (status, text) = self
            .post(route, &RequestReviewersBody::from(reviewers))
            .await?;

        if status != StatusCode::CREATED {
            return Err(PublishError::RemoteRejected {
                operation: "reviewer request",
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(())
    }
}
