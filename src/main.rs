//! # Pulp Repo Controller
//!
//! Converges RPM repositories on a Pulp 2 server to a declared desired state.
//!
//! 1. **Read the desired state** - a YAML document listing repositories
//! 2. **Observe** - fetch every RPM repository once through the REST API
//! 3. **Decide** - create, update, delete or leave each repository alone
//! 4. **Act** - run `pulp-admin rpm repo <verb>` per repository, then re-read it
//!
//! See `pulp-repo-controller --help` for the available commands.

use anyhow::Result;
use clap::Parser;
use pulp_repo_controller::cli::{execute, Cli};
use pulp_repo_controller::config::ControllerConfig;
use pulp_repo_controller::observability::metrics;
use pulp_repo_controller::runtime;
use std::process::ExitCode;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // A missing .env file is the normal case
    let dotenv = dotenvy::dotenv();

    let mut config = ControllerConfig::from_env();
    cli.global.apply_to(&mut config);

    runtime::initialize(&config)?;
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }
    debug!("Configuration: {:?}", config);

    let code = execute(cli.command, &config).await?;

    if let Some(path) = &config.metrics_textfile {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("Failed to write metrics textfile: {:#}", e);
        }
    }
    Ok(code)
}
