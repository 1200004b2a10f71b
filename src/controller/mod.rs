//! # Controller
//!
//! Core controller modules for the Pulp Repo Controller.
//!
//! - `reconciler`: normalization, drift detection, marshalling and the
//!   reconciliation run
pub mod reconciler;
