//! Shared reconciler types

use super::validation::ValidationError;
use crate::provider::{ExecutionError, InventoryFetchError, Verb};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid desired state: {0}")]
    Validation(#[from] ValidationError),

    /// Listing failed; nothing was reconciled
    #[error("inventory fetch failed: {0}")]
    Inventory(#[from] InventoryFetchError),

    #[error("cannot {operation} repository '{repo_id}' while it is {state}")]
    InvalidTransition {
        repo_id: String,
        operation: &'static str,
        state: &'static str,
    },

    /// The executor's message is shown as-is
    #[error("{source}")]
    Execution {
        repo_id: String,
        verb: Verb,
        #[source]
        source: ExecutionError,
    },

    /// The command succeeded but the follow-up read did not
    #[error("repository '{repo_id}' was {verb}d but could not be re-read: {source}")]
    Refresh {
        repo_id: String,
        verb: Verb,
        #[source]
        source: InventoryFetchError,
    },
}

/// What a run does to one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
    None,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::None => "none",
        }
    }
}

impl From<Option<Verb>> for Action {
    fn from(verb: Option<Verb>) -> Self {
        match verb {
            Some(Verb::Create) => Action::Create,
            Some(Verb::Update) => Action::Update,
            Some(Verb::Delete) => Action::Delete,
            None => Action::None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether commits are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Apply,
    /// Decide and report only
    Plan,
}
