//! Local working copies of target repositories.
//!
//! The [`WorkspaceManager`] trait is the version-control capability the
//! runner depends on; [`GitWorkspaceManager`] implements it with the `git`
//! command line.

mod error;
mod git;
mod state;

pub use error::WorkspaceError;
pub use state::WorkspaceState;

use crate::config::RepositoryDescriptor;
use git::run_git_command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use url::Url;

/// Default remote the repositories are cloned from.
pub const DEFAULT_GIT_REMOTE: &str = "https://github.com";

const DIR_PREFIX: &str = "commit-cannon-";
const COMMIT_NAME: &str = "Commit Cannon";
const COMMIT_EMAIL: &str = "bot@commit-cannon";

/// An isolated working copy of one repository.
///
/// The directory is deleted when the workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    repository: String,
    base_branch: String,
    dir: TempDir,
}

impl Workspace {
    /// Wraps an existing temporary directory as the workspace of `repository`.
    pub fn new(repository: &RepositoryDescriptor, dir: TempDir) -> Self {
        Self {
            repository: repository.name.clone(),
            base_branch: repository.base_branch().to_string(),
            dir,
        }
    }

    /// Returns the working copy directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the repository full name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the branch the working copy was cloned from.
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }
}

/// Result of [`WorkspaceManager::commit_and_push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Changes were committed and the branch pushed.
    Committed,

    /// The working tree had no changes; nothing was committed or pushed.
    NothingToCommit,
}

/// Clone, branch and publish operations on repository working copies.
#[allow(async_fn_in_trait)]
pub trait WorkspaceManager {
    /// Clones `repository` at its base branch into a fresh workspace.
    async fn prepare(&self, repository: &RepositoryDescriptor) -> Result<Workspace, WorkspaceError>;

    /// Creates and checks out `branch` from the workspace's base branch.
    ///
    /// Fails with [`WorkspaceError::BranchExists`] if the remote already has it.
    async fn new_branch(&self, workspace: &Workspace, branch: &str) -> Result<(), WorkspaceError>;

    /// Stages everything, commits with `message` and pushes `branch`.
    async fn commit_and_push(
        &self,
        workspace: &Workspace,
        branch: &str,
        message: &str,
    ) -> Result<CommitOutcome, WorkspaceError>;
}

/// [`WorkspaceManager`] backed by the `git` command line.
#[derive(Clone)]
pub struct GitWorkspaceManager {
    remote: String,
    token: Option<String>,
    root: Option<PathBuf>,
}

impl GitWorkspaceManager {
    /// Creates a manager cloning from `remote` (e.g. `https://github.com` or a local directory).
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            token: None,
            root: None,
        }
    }

    /// Authenticates http(s) clones and pushes with `token`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Creates workspaces under `root` instead of the system temp directory.
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = Some(root);
        self
    }

    /// Returns the clone URL of `repository`.
    fn clone_url(&self, repository: &RepositoryDescriptor) -> String {
        match Url::parse(&self.remote) {
            Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
                if let Some(token) = &self.token {
                    // Only fails for URLs without a host, which http(s) always has.
                    let _ = url.set_username("x-access-token");
                    let _ = url.set_password(Some(token));
                }
                format!(
                    "{}/{}.git",
                    url.as_str().trim_end_matches('/'),
                    repository.name
                )
            }
            _ => format!(
                "{}/{}.git",
                self.remote.trim_end_matches(['/', '\\']),
                repository.name
            ),
        }
    }

    /// Masks the token in git output that may echo the clone URL.
    fn redact(&self, message: String) -> String {
        match &self.token {
            Some(token) if !token.is_empty() => message.replace(token.as_str(), "***"),
            _ => message,
        }
    }

    fn create_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        match &self.root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
    }
}

impl std::fmt::Debug for GitWorkspaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitWorkspaceManager")
            .field("remote", &self.remote)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WorkspaceManager for GitWorkspaceManager {
    async fn prepare(&self, repository: &RepositoryDescriptor) -> Result<Workspace, WorkspaceError> {
        let base = repository.base_branch();
        debug!(repo = %repository.name, base, "Cloning repository");

        let clone_failed = |message: String| WorkspaceError::CloneFailed {
            repository: repository.name.clone(),
            message,
        };

        let dir = self
            .create_dir()
            .map_err(|e| clone_failed(format!("Failed to create temp directory: {e}")))?;

        let url = self.clone_url(repository);
        run_git_command(
            dir.path(),
            &["clone", "--depth", "1", "--branch", base, &url, "."],
        )
        .await
        .map_err(|e| clone_failed(self.redact(e.to_string())))?;

        Ok(Workspace::new(repository, dir))
    }

    async fn new_branch(&self, workspace: &Workspace, branch: &str) -> Result<(), WorkspaceError> {
        debug!(branch, "Creating branch");

        let branch_failed = |message: String| WorkspaceError::BranchFailed {
            branch: branch.to_string(),
            message,
        };

        let remote_ref = format!("refs/heads/{branch}");
        let existing = run_git_command(
            workspace.path(),
            &["ls-remote", "--heads", "origin", &remote_ref],
        )
        .await
        .map_err(|e| branch_failed(self.redact(e.to_string())))?;

        if !existing.is_empty() {
            return Err(WorkspaceError::BranchExists {
                repository: workspace.repository().to_string(),
                branch: branch.to_string(),
            });
        }

        run_git_command(workspace.path(), &["checkout", "-b", branch])
            .await
            .map_err(|e| branch_failed(e.to_string()))?;

        Ok(())
    }

    async fn commit_and_push(
        &self,
        workspace: &Workspace,
        branch: &str,
        message: &str,
    ) -> Result<CommitOutcome, WorkspaceError> {
        debug!(branch, "Committing and pushing changes");

        let path = workspace.path();
        let commit_failed = |message: String| WorkspaceError::CommitPushFailed {
            branch: branch.to_string(),
            message,
        };

        run_git_command(path, &["config", "user.email", COMMIT_EMAIL])
            .await
            .map_err(|e| commit_failed(e.to_string()))?;
        run_git_command(path, &["config", "user.name", COMMIT_NAME])
            .await
            .map_err(|e| commit_failed(e.to_string()))?;

        run_git_command(path, &["add", "-A"])
            .await
            .map_err(|e| commit_failed(e.to_string()))?;

        let status = run_git_command(path, &["status", "--porcelain"])
            .await
            .map_err(|e| commit_failed(e.to_string()))?;
        if status.is_empty() {
            info!(branch, "Nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        run_git_command(path, &["commit", "-m", message])
            .await
            .map_err(|e| commit_failed(e.to_string()))?;

        let refspec = format!("HEAD:refs/heads/{branch}");
        run_git_command(path, &["push", "origin", &refspec])
            .await
            .map_err(|e| commit_failed(self.redact(e.to_string())))?;

        info!(branch, "Pushed branch");
        Ok(CommitOutcome::Committed)
    }
}
