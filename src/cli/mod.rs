//! # Command-Line Interface
//!
//! ## Usage
//!
//! ```bash
//! # Converge the server to a desired-state document
//! pulp-repo-controller apply -f repos.yaml
//!
//! # Show what apply would do, without running pulp-admin
//! pulp-repo-controller plan -f repos.yaml --json
//!
//! # Print every RPM repository in canonical form
//! pulp-repo-controller list --output json
//!
//! # Print the JSON Schema of the desired-state document
//! pulp-repo-controller schema
//! ```

mod apply;
mod list;
mod schema;

pub use apply::apply_command;
pub use list::list_command;
pub use schema::schema_command;

use crate::config::ControllerConfig;
use crate::controller::reconciler::RunMode;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

/// Pulp RPM repository reconciler
#[derive(Debug, Parser)]
#[command(name = "pulp-repo-controller", version)]
#[command(
    about = "Reconcile declarative Pulp RPM repository definitions",
    long_about = None,
    after_help = "\
Configuration is read from the environment (and an optional .env file);
global options override it.

Examples:
  pulp-repo-controller plan -f repos.yaml
  pulp-repo-controller apply -f repos.yaml --json
  pulp-repo-controller list --output yaml
"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Overrides for environment configuration
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Base URL of the Pulp server [env: PULP_API_URL]
    #[arg(long, global = true)]
    pub pulp_api_url: Option<String>,

    /// Path of the pulp-admin binary [env: PULP_ADMIN_PATH]
    #[arg(long, global = true)]
    pub pulp_admin_path: Option<PathBuf>,

    /// Pulp username [env: PULP_USERNAME]
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Skip TLS certificate verification of the REST API
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Log level: error, warn, info, debug, trace [env: LOG_LEVEL]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format [env: LOG_FORMAT]
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Write Prometheus metrics to this file after the run [env: METRICS_TEXTFILE]
    #[arg(long, global = true)]
    pub metrics_textfile: Option<PathBuf>,
}

impl GlobalArgs {
    /// Apply command-line overrides on top of `config`
    pub fn apply_to(&self, config: &mut ControllerConfig) {
        if let Some(url) = &self.pulp_api_url {
            config.pulp_api_url.clone_from(url);
        }
        if let Some(path) = &self.pulp_admin_path {
            config.pulp_admin_path.clone_from(path);
        }
        if let Some(username) = &self.username {
            config.pulp_username = Some(username.clone());
        }
        if self.insecure {
            config.pulp_verify_ssl = false;
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
        if let Some(format) = self.log_format {
            config.log_format = format.as_str().to_string();
        }
        if let Some(path) = &self.metrics_textfile {
            config.metrics_textfile = Some(path.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile the server against a desired-state document
    Apply {
        /// Desired-state document (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the actions apply would take, without running pulp-admin
    Plan {
        /// Desired-state document (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List RPM repositories in canonical form
    List {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },
    /// Print the JSON Schema of the desired-state document
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// Run a subcommand
///
/// # Errors
/// Returns an error when the command could not run at all. Per-repository
/// failures are reported and reflected in the exit code instead.
pub async fn execute(command: Commands, config: &ControllerConfig) -> Result<ExitCode> {
    match command {
        Commands::Apply { file, json } => apply_command(config, &file, RunMode::Apply, json).await,
        Commands::Plan { file, json } => apply_command(config, &file, RunMode::Plan, json).await,
        Commands::List { output } => list_command(config, output).await.map(|()| ExitCode::SUCCESS),
        Commands::Schema => schema_command().map(|()| ExitCode::SUCCESS),
    }
}
