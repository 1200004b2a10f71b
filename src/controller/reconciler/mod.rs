//! # Reconciler
//!
//! Converges RPM repositories on a Pulp server to a declared desired state.
//!
//! The reconciler:
//! - Fetches every RPM repository once and normalizes it into canonical state
//! - Binds each declared repository to its canonical counterpart
//! - Decides create, update, delete or nothing per repository
//! - Marshals desired properties into pulp-admin arguments and commits them
//! - Re-reads each repository after its command ran
//!
//! ## Reconciliation Flow
//!
//! 1. Validate the desired-state document
//! 2. Fetch the inventory (`inventory.rs`, `normalize.rs`)
//! 3. Bind and decide (`binding.rs`, `secrets.rs` for secret-file drift)
//! 4. Commit through the executor (`marshal.rs`)
//! 5. Report (`report.rs`)

pub mod binding;
pub mod inventory;
pub mod marshal;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod secrets;
pub mod types;
pub mod validation;

// Re-export public API
pub use binding::{Binding, BindingState, Mutation, PendingMutation};
pub use inventory::Inventory;
pub use marshal::marshal;
pub use normalize::normalize;
pub use reconcile::Reconciler;
pub use report::{Outcome, RepoReport, RunReport};
pub use secrets::{SecretComparison, SecretReadError};
pub use types::{Action, ReconcileError, RunMode};
pub use validation::ValidationError;
