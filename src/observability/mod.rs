//! # Observability
//!
//! - `metrics`: Prometheus metrics collection and textfile export

pub mod metrics;
