//! # Validation
//!
//! Validates the desired-state document before the inventory is fetched.

mod desired;
mod repo_id;

pub use desired::validate_desired_state;
pub use repo_id::validate_repo_id;

use thiserror::Error;

/// Desired state that cannot be reconciled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid repository id '{0}': only letters, digits, '_', '.' and '-' are allowed, it must not start with '-' and must not be '.' or '..'")]
    InvalidRepoId(String),
    #[error("repository '{0}' is declared more than once")]
    DuplicateRepo(String),
    #[error("repository '{repo_id}': proxy_port {port} is outside 1..=65535")]
    InvalidProxyPort { repo_id: String, port: u64 },
    #[error("repository '{repo_id}': note key '{key}' must be non-empty and must not contain '='")]
    InvalidNoteKey { repo_id: String, key: String },
    #[error("repository '{repo_id}': skip entry '{entry}' must be non-empty and must not contain ','")]
    InvalidSkipEntry { repo_id: String, entry: String },
    #[error("repository '{repo_id}': unknown property '{key}'")]
    UnknownProperty { repo_id: String, key: String },
}
