//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{RepositoryOutcome, RepositoryResult, Stage};
pub use run_summary::RunSummary;
