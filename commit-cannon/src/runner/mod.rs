//! Orchestrates a batch across repositories.
//!
//! Repositories are processed one at a time, in configured order. Every error
//! after the batch file has been loaded is caught at repository granularity
//! and turned into a [`RepositoryOutcome`], so one repository can never abort
//! its siblings.

mod config;
mod error;
#[cfg(test)]
mod tests;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::config::{BatchConfig, RepositoryDescriptor};
use crate::pull_requests::{
    manual_pr_url, GitHubPublisher, PrRequest, PublishError, Publisher, TOKEN_ENV_VAR,
};
use crate::summary::{RepositoryOutcome, RepositoryResult, RunSummary, Stage};
use crate::templates::{PrBodyContext, TemplateRenderer};
use crate::workspace::{CommitOutcome, GitWorkspaceManager, WorkspaceManager, WorkspaceState};
use tracing::{error, info, info_span, warn, Instrument};

/// Loads a batch file and runs it against GitHub.
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Executes the full orchestration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the batch file is invalid or the GitHub
    /// client cannot be created. Per-repository failures are reported in the
    /// returned summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        info!(path = %self.config.config_path().display(), "Loading batch");
        let batch = BatchConfig::load(self.config.config_path())?;
        info!(
            repositories = batch.repositories.len(),
            actions = batch.actions.len(),
            "Loaded batch"
        );

        if self.config.dry_run() {
            print_dry_run_preview(&batch);
            return Ok(RunSummary::new(true));
        }

        let token = self
            .config
            .token()
            .filter(|token| !token.trim().is_empty())
            .ok_or(PublishError::MissingToken { var: TOKEN_ENV_VAR })?;

        let publisher = GitHubPublisher::new(self.config.api_url(), token)?;
        let mut workspaces = GitWorkspaceManager::new(self.config.git_remote()).with_token(token);
        if let Some(root) = self.config.workspace_root() {
            workspaces = workspaces.with_root(root.to_path_buf());
        }

        Ok(BatchRunner::new(workspaces, publisher).run(&batch).await)
    }
}

/// Drives the per-repository pipeline over any workspace manager and publisher.
pub struct BatchRunner<W, P> {
    workspaces: W,
    publisher: P,
    renderer: TemplateRenderer,
}

impl<W: WorkspaceManager, P: Publisher> BatchRunner<W, P> {
    /// Creates a runner from its two capabilities.
    pub fn new(workspaces: W, publisher: P) -> Self {
        Self {
            workspaces,
            publisher,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Processes every repository of `batch`, returning one result per repository.
    pub async fn run(&self, batch: &BatchConfig) -> RunSummary {
        let mut summary = RunSummary::new(false);
        let total = batch.repositories.len();

        for (index, repository) in batch.repositories.iter().enumerate() {
            info!(
                repo = %repository.name,
                position = index + 1,
                total,
                "Processing repository"
            );

            let outcome = self
                .process_repository(batch, repository)
                .instrument(info_span!("repository", repo = %repository.name))
                .await;

            summary.record_result(RepositoryResult {
                repository: repository.name.clone(),
                outcome,
            });
        }

        summary
    }

    async fn process_repository(
        &self,
        batch: &BatchConfig,
        repository: &RepositoryDescriptor,
    ) -> RepositoryOutcome {
        // Dropping the workspace removes its directory on every return path.
        let workspace = match self.workspaces.prepare(repository).await {
            Ok(workspace) => workspace,
            Err(e) => {
                error!(error = %e, "Failed to prepare workspace");
                return RepositoryOutcome::failed(Stage::Prepare, e);
            }
        };

        let branch = batch.branch_name.as_str();
        if let Err(e) = self.workspaces.new_branch(&workspace, branch).await {
            error!(branch, error = %e, "Failed to create branch");
            return RepositoryOutcome::failed(Stage::Branch, e);
        }

        let mut state = WorkspaceState::new(workspace.path(), branch);
        let mut action_errors = Vec::new();

        for (index, action) in batch.actions.iter().enumerate() {
            match action.apply(state.dir()).await {
                Ok(result) => {
                    info!(action = action.kind(), %result, "Applied action");
                    state.record(result);
                }
                Err(e) => {
                    warn!(
                        action = action.kind(),
                        position = index + 1,
                        error = %e,
                        "Action failed, skipping remaining actions"
                    );
                    action_errors.push(format!("action #{} ({}): {e}", index + 1, action.kind()));
                    break;
                }
            }
        }

        if !state.has_results() {
            if let Some(error) = action_errors.pop() {
                return RepositoryOutcome::Failed {
                    stage: Stage::Actions,
                    error,
                };
            }
            info!("No actions applied, skipping");
            return RepositoryOutcome::SkippedNoChanges;
        }

        match self
            .workspaces
            .commit_and_push(&workspace, branch, &batch.commit_message)
            .await
        {
            Ok(CommitOutcome::Committed) => {}
            Ok(CommitOutcome::NothingToCommit) => {
                if let Some(error) = action_errors.pop() {
                    return RepositoryOutcome::Failed {
                        stage: Stage::Actions,
                        error,
                    };
                }
                info!("Working tree unchanged, skipping PR");
                return RepositoryOutcome::SkippedNoChanges;
            }
            Err(e) => {
                error!(error = %e, "Failed to commit and push");
                return RepositoryOutcome::failed(Stage::Commit, e);
            }
        }

        let context = PrBodyContext {
            description: &batch.description,
            results: state.results(),
            repository: &repository.name,
            branch,
            title: &batch.title,
        };
        let body = match self
            .renderer
            .render_pr_body(batch.body_template.as_deref(), &context)
        {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to render PR description");
                return RepositoryOutcome::failed(Stage::PullRequest, e);
            }
        };

        let request = PrRequest {
            repository: repository.name.clone(),
            base: repository.base_branch().to_string(),
            title: batch.title.clone(),
            head: branch.to_string(),
            body,
        };
        let pr = match self.publisher.create_pr(&request).await {
            Ok(pr) => pr,
            Err(e) => {
                let url = manual_pr_url(&repository.name, branch);
                error!(error = %e, %url, "Failed to create PR; pushed branch left in place");
                return RepositoryOutcome::failed(
                    Stage::PullRequest,
                    format!("{e} (open it manually at {url})"),
                );
            }
        };

        let mut warnings = Vec::new();
        if !batch.reviewers.is_empty() {
            if let Err(e) = self
                .publisher
                .add_reviewers(&repository.name, pr.number, &batch.reviewers)
                .await
            {
                warn!(pr_number = pr.number, error = %e, "Failed to request reviewers");
                warnings.push(format!("reviewer request failed: {e}"));
            }
        }

        if action_errors.is_empty() {
            RepositoryOutcome::Success { pr, warnings }
        } else {
            RepositoryOutcome::PartialSuccess {
                pr,
                errors: action_errors,
                warnings,
            }
        }
    }
}

fn print_dry_run_preview(batch: &BatchConfig) {
    println!("\n[DRY RUN] {}", batch.title);
    println!("  Branch: {}", batch.branch_name);
    println!("  Commit message: {}", batch.commit_message);
    println!("  Actions:");
    for (i, action) in batch.actions.iter().enumerate() {
        println!("    {}. {}", i + 1, action.describe());
    }

    println!("  Repositories ({}):\n", batch.repositories.len());
    for (i, repo) in batch.repositories.iter().enumerate() {
        println!(
            "  [{}/{}] {} ({} <- {})",
            i + 1,
            batch.repositories.len(),
            repo.name,
            repo.base_branch(),
            batch.branch_name
        );
    }

    if !batch.reviewers.is_empty() {
        println!(
            "\n  Reviewers: users [{}], teams [{}]",
            batch.reviewers.users.join(", "),
            batch.reviewers.teams.join(", ")
        );
    }

    println!();
}
