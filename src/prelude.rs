//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use pulp_repo_controller::prelude::*;
//! ```

// Desired and canonical state
pub use crate::resource::{
    CanonicalState, DesiredRepo, DesiredStateFile, Ensure, Property, PropertyValue,
    RepoProperties, RepoRecord, TriState,
};

// Collaborator traits - needed for alternative executors and listers
pub use crate::provider::{
    CommandExecutor, ExecutionError, InventoryFetchError, InventoryLister, RawPlugin, RawRepo,
    Verb,
};

// Reconciler types - core functionality
pub use crate::controller::reconciler::{
    Action, Binding, Inventory, Outcome, ReconcileError, Reconciler, RunMode, RunReport,
};

pub use crate::config::ControllerConfig;
pub use crate::provider::pulp::{PulpAdmin, PulpApi};
