//! # Repository Resource
//!
//! Types describing an RPM repository on both sides of reconciliation.
//!
//! ## Module Structure
//!
//! - `property.rs` - Property table, value shapes and tri-state booleans
//! - `spec.rs` - Desired state and the desired-state document
//! - `state.rs` - Canonical (remote) state

mod property;
mod spec;
mod state;

pub use property::{Property, PropertyKind, PropertyValue, TriState};
pub use spec::{DesiredRepo, DesiredStateFile, Ensure, RepoProperties};
pub use state::{CanonicalState, RepoRecord};
