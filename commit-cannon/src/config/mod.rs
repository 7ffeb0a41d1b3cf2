//! Batch configuration loading.
//!
//! A batch file describes the PR to open (title, branch, commit message,
//! description, reviewers), the repositories to open it in, and the ordered
//! actions to apply:
//!
//! ```text
//! title = "Switch database user"
//! branch-name = "switch-db-user"
//! commit-message = "Use the SA database user"
//!
//! [[repos]]
//! name = "acme/api"
//! base = "develop"
//!
//! [[actions]]
//! type = "replace-line"
//! source = "DB_USER=core"
//! target = "DB_USER=SA"
//! path = ".env.example"
//! ```

mod batch;
mod error;
mod repository;
mod reviewers;

pub use batch::BatchConfig;
pub use error::ConfigError;
pub use repository::{RepositoryDescriptor, DEFAULT_BASE_BRANCH};
pub use reviewers::Reviewers;
