//! Pulp Repo Controller Library
//!
//! Reconciles declarative RPM repository definitions against a Pulp 2 server.
//! Observation goes through the Pulp REST API, mutation through `pulp-admin`.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulp_repo_controller::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod resource;
pub mod runtime;
