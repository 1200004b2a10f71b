//! # Initialization
//!
//! rustls setup, tracing, metrics registration and construction of the
//! Pulp collaborators.

use crate::config::ControllerConfig;
use crate::controller::reconciler::Reconciler;
use crate::observability;
use crate::provider::pulp::{PulpAdmin, PulpApi};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize the process
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Build info logging
/// - Metrics registration
///
/// # Errors
/// Returns an error if tracing or metrics cannot be initialized.
pub fn initialize(config: &ControllerConfig) -> Result<()> {
    // Must happen before any TLS client is built. An error only means a
    // provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    init_tracing(config)?;

    info!("Starting Pulp Repo Controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    observability::metrics::register_metrics()?;
    Ok(())
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the filter is
/// `pulp_repo_controller=<log_level>`. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &ControllerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulp_repo_controller={}", config.log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json_logs() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

/// Build a reconciler backed by pulp-admin and the Pulp REST API
///
/// With `resolve_admin` unset the configured binary path is used as is and
/// never checked. Callers that will not invoke the executor (plan, list)
/// pass `false` so the binary is not required to exist.
///
/// # Errors
/// Returns an error if the binary cannot be found (when `resolve_admin` is
/// set) or the HTTP client cannot be built.
pub fn create_reconciler(config: &ControllerConfig, resolve_admin: bool) -> Result<Reconciler> {
    let admin = if resolve_admin {
        PulpAdmin::from_config(config).context("Failed to set up pulp-admin executor")?
    } else {
        PulpAdmin::new(&config.pulp_admin_path)
            .with_credentials(config.pulp_username.clone(), config.pulp_password.clone())
    };
    let api = PulpApi::from_config(config).context("Failed to set up Pulp REST client")?;
    Ok(Reconciler::new(Arc::new(admin), Arc::new(api)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_without_admin() -> ControllerConfig {
        ControllerConfig {
            pulp_admin_path: PathBuf::from("pulp-admin-not-installed-for-tests"),
            ..ControllerConfig::default()
        }
    }

    #[test]
    fn test_unresolved_admin_is_not_required() {
        assert!(create_reconciler(&config_without_admin(), false).is_ok());
    }

    #[test]
    fn test_resolved_admin_must_exist() {
        let err = create_reconciler(&config_without_admin(), true).unwrap_err();
        assert!(format!("{err:#}").contains("pulp-admin"));
    }
}
