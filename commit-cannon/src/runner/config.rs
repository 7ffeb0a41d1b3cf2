//! Runner configuration.

use crate::pull_requests::DEFAULT_API_URL;
use crate::workspace::DEFAULT_GIT_REMOTE;
use std::path::{Path, PathBuf};

/// Configuration for running a batch.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the batch file.
    config_path: PathBuf,
    /// GitHub token used for API calls, clones and pushes.
    token: Option<String>,
    /// Whether to preview the batch without touching any repository.
    dry_run: bool,
    /// GitHub REST API base URL.
    api_url: String,
    /// Remote repositories are cloned from.
    git_remote: String,
    /// Directory workspaces are created in (system temp dir when unset).
    workspace_root: Option<PathBuf>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_path: PathBuf, token: Option<String>, dry_run: bool) -> Self {
        Self {
            config_path,
            token,
            dry_run,
            api_url: DEFAULT_API_URL.to_string(),
            git_remote: DEFAULT_GIT_REMOTE.to_string(),
            workspace_root: None,
        }
    }

    /// Sets a custom API base URL (e.g. GitHub Enterprise).
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    /// Sets a custom git remote.
    pub fn with_git_remote(mut self, git_remote: String) -> Self {
        self.git_remote = git_remote;
        self
    }

    /// Sets the directory workspaces are created in.
    pub fn with_workspace_root(mut self, workspace_root: PathBuf) -> Self {
        self.workspace_root = Some(workspace_root);
        self
    }

    /// Returns the batch file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the git remote.
    pub fn git_remote(&self) -> &str {
        &self.git_remote
    }

    /// Returns the workspace root, if set.
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }
}
