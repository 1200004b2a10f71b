//! # Configuration
//!
//! Runtime configuration for the controller.
//!
//! - `controller.rs` - Pulp connection, logging and metrics settings

mod controller;

pub use controller::ControllerConfig;
