//! # Pulp Providers
//!
//! - `admin.rs` - mutation through the pulp-admin client
//! - `api.rs` - observation through the Pulp v2 REST API
//! - `responses.rs` - raw repository records

pub mod admin;
pub mod api;
pub mod responses;

pub use admin::PulpAdmin;
pub use api::PulpApi;
