//! # Apply and Plan Commands

use crate::config::ControllerConfig;
use crate::controller::reconciler::RunMode;
use crate::resource::DesiredStateFile;
use crate::runtime::create_reconciler;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

/// Reconcile (or plan) the repositories declared in `file`
///
/// Exits non-zero when any repository failed.
pub async fn apply_command(
    config: &ControllerConfig,
    file: &Path,
    mode: RunMode,
    json: bool,
) -> Result<ExitCode> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read desired state from {}", file.display()))?;
    let document = DesiredStateFile::from_yaml(&content)
        .with_context(|| format!("Failed to parse desired state in {}", file.display()))?;

    let reconciler = create_reconciler(config, mode == RunMode::Apply)?;
    let report = reconciler
        .run(document.repos, mode)
        .await
        .context("Reconciliation run aborted")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
        );
    } else {
        println!("{report}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
