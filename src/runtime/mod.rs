//! # Runtime
//!
//! Process-level setup shared by every subcommand.

pub mod initialization;

pub use initialization::{create_reconciler, initialize, init_tracing};
