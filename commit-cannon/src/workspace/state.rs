//! Per-repository runtime state.

use std::path::{Path, PathBuf};

/// State accumulated while processing one repository.
///
/// Created once the branch exists and discarded when the repository is done;
/// the recorded results become the bullet list of the PR description.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    dir: PathBuf,
    branch: String,
    results: Vec<String>,
}

impl WorkspaceState {
    /// Creates state for a workspace checked out on `branch`.
    pub fn new(dir: &Path, branch: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            branch: branch.to_string(),
            results: Vec::new(),
        }
    }

    /// Records the result string of a successfully applied action.
    pub fn record(&mut self, result: String) {
        self.results.push(result);
    }

    /// Returns the workspace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the branch the changes are made on.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the recorded results in application order.
    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// Returns true if at least one action produced a result.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}
