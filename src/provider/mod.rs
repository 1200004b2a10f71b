//! # Provider Modules
//!
//! The two seams between the reconciler and the Pulp server.
//!
//! - `CommandExecutor` mutates: it runs one `create`, `update` or `delete`
//!   command per repository with the marshalled flags.
//! - `InventoryLister` observes: it returns raw repository records.
//!
//! The reconciler only depends on these traits; `pulp` holds the
//! implementations backed by `pulp-admin` and the Pulp REST API.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod pulp;

pub use pulp::responses::{RawPlugin, RawRepo};

/// pulp-admin verb for one repository mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Create,
    Update,
    Delete,
}

impl Verb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a mutation command
///
/// The display form of `Failed` is the tool's own message, unchanged, so
/// callers surface the root cause verbatim.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    Failed {
        /// Exit code, `None` when terminated by a signal
        status: Option<i32>,
        message: String,
    },
}

/// Failure to observe the remote inventory
#[derive(Debug, Error)]
pub enum InventoryFetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode repositories from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("inventory listing failed: {0}")]
    Unavailable(String),
}

/// Runs mutation commands against the Pulp server
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `verb` for `repo_id` with the given (flag, value) pairs, in order
    async fn invoke(
        &self,
        verb: Verb,
        repo_id: &str,
        args: &[(String, String)],
    ) -> Result<(), ExecutionError>;
}

/// Reads repository records from the Pulp server
#[async_trait]
pub trait InventoryLister: Send + Sync {
    /// All repositories, of every plugin type
    async fn list_all(&self) -> Result<Vec<RawRepo>, InventoryFetchError>;

    /// One repository, `None` when the id does not exist
    async fn get_one(&self, repo_id: &str) -> Result<Option<RawRepo>, InventoryFetchError>;
}
