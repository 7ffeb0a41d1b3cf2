//! Run summary types.

use super::result::{RepositoryOutcome, RepositoryResult};

/// Summary of a complete batch run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// One entry per configured repository, in processing order.
    pub results: Vec<RepositoryResult>,

    /// Number of PRs opened with every action applied.
    pub prs_created: usize,

    /// Number of PRs opened after an action failure.
    pub prs_partial: usize,

    /// Number of repositories that failed before a PR was opened.
    pub repositories_failed: usize,

    /// Number of repositories left unchanged by the actions.
    pub repositories_skipped: usize,

    /// Number of reviewer requests (or other post-PR steps) that failed.
    pub warnings: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records the outcome of one repository.
    pub fn record_result(&mut self, result: RepositoryResult) {
        match &result.outcome {
            RepositoryOutcome::Success { warnings, .. } => {
                self.prs_created += 1;
                self.warnings += warnings.len();
            }
            RepositoryOutcome::PartialSuccess { warnings, .. } => {
                self.prs_partial += 1;
                self.warnings += warnings.len();
            }
            RepositoryOutcome::Failed { .. } => self.repositories_failed += 1,
            RepositoryOutcome::SkippedNoChanges => self.repositories_skipped += 1,
        }
        self.results.push(result);
    }

    /// Returns the outcome recorded for `repository`.
    #[must_use]
    pub fn get(&self, repository: &str) -> Option<&RepositoryOutcome> {
        self.results
            .iter()
            .find(|result| result.repository == repository)
            .map(|result| &result.outcome)
    }

    /// Returns the number of repositories processed.
    #[must_use]
    pub fn repositories_processed(&self) -> usize {
        self.results.len()
    }

    /// Returns true if any repository failed fully or partially.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.repositories_failed > 0 || self.prs_partial > 0
    }

    /// Returns true if every repository succeeded or had nothing to change.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
