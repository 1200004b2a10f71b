//! # pulp-admin Executor
//!
//! Runs `pulp-admin rpm repo <verb> --repo-id <id> <flags...>`.
//!
//! Arguments are handed to the process directly, never through a shell, so
//! values need no quoting. The password passed with `-p` and the value of
//! `--proxy-pass` are masked in logs.

use super::super::{CommandExecutor, ExecutionError, Verb};
use crate::config::ControllerConfig;
use crate::constants::{PULP_ADMIN_BINARY, REDACTED};
use crate::controller::reconciler::marshal::redact;
use crate::observability::metrics;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Executor backed by the pulp-admin client
#[derive(Clone)]
pub struct PulpAdmin {
    program: PathBuf,
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for PulpAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulpAdmin")
            .field("program", &self.program)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl PulpAdmin {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            username: None,
            password: None,
        }
    }

    /// Authenticate every command with `-u`/`-p`
    #[must_use]
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }

    /// Build an executor from configuration, resolving the binary
    ///
    /// The configured path is used when it exists; otherwise `pulp-admin`
    /// is looked up on PATH.
    ///
    /// # Errors
    /// Returns an error if no pulp-admin binary can be found.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        let program = resolve_program(&config.pulp_admin_path)?;
        info!("Using pulp-admin at {}", program.display());
        Ok(Self::new(program)
            .with_credentials(config.pulp_username.clone(), config.pulp_password.clone()))
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument vector (without the program name)
    #[must_use]
    pub fn command_line(&self, verb: Verb, repo_id: &str, args: &[(String, String)]) -> Vec<String> {
        let mut argv = Vec::with_capacity(6 + args.len() * 2);
        if let Some(username) = &self.username {
            argv.push("-u".to_string());
            argv.push(username.clone());
        }
        if let Some(password) = &self.password {
            argv.push("-p".to_string());
            argv.push(password.clone());
        }
        argv.extend(
            ["rpm", "repo", verb.as_str(), "--repo-id", repo_id]
                .iter()
                .map(ToString::to_string),
        );
        for (flag, value) in args {
            argv.push(flag.clone());
            argv.push(value.clone());
        }
        argv
    }

    /// Command line safe for logging
    fn display_command(&self, verb: Verb, repo_id: &str, args: &[(String, String)]) -> String {
        let mut argv = self.command_line(verb, repo_id, &redact(args));
        if let Some(pos) = argv.iter().position(|a| a == "-p") {
            if let Some(value) = argv.get_mut(pos + 1) {
                *value = REDACTED.to_string();
            }
        }
        format!("{} {}", self.program.display(), argv.join(" "))
    }
}

fn resolve_program(configured: &Path) -> Result<PathBuf> {
    if configured.is_file() {
        return Ok(configured.to_path_buf());
    }
    // A bare name like "pulp-admin" is searched for as given
    let name = if configured.components().count() == 1 {
        configured.as_os_str().to_owned()
    } else {
        warn!(
            "Configured pulp-admin path {} does not exist, searching PATH",
            configured.display()
        );
        PULP_ADMIN_BINARY.into()
    };
    which::which(&name).with_context(|| {
        format!(
            "pulp-admin not found at {} or on PATH",
            configured.display()
        )
    })
}

#[async_trait]
impl CommandExecutor for PulpAdmin {
    async fn invoke(
        &self,
        verb: Verb,
        repo_id: &str,
        args: &[(String, String)],
    ) -> Result<(), ExecutionError> {
        let start = Instant::now();
        debug!(
            repo_id = %repo_id,
            verb = %verb,
            "Running {}",
            self.display_command(verb, repo_id, args)
        );
        metrics::increment_commands(verb.as_str());

        let output = Command::new(&self.program)
            .args(self.command_line(verb, repo_id, args))
            .output()
            .await
            .map_err(|source| ExecutionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            metrics::increment_command_errors(verb.as_str());
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ExecutionError::Failed {
                status: output.status.code(),
                message,
            });
        }

        info!(
            repo_id = %repo_id,
            verb = %verb,
            elapsed_ms = start.elapsed().as_millis(),
            "pulp-admin rpm repo {} succeeded",
            verb
        );
        Ok(())
    }
}
