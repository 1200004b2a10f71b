//! # List Command

use super::OutputFormat;
use crate::config::ControllerConfig;
use crate::resource::CanonicalState;
use crate::runtime::create_reconciler;
use anyhow::{Context, Result};

/// Print every RPM repository in canonical form
///
/// Secret contents are replaced by fingerprints and the proxy password is
/// masked.
pub async fn list_command(config: &ControllerConfig, output: OutputFormat) -> Result<()> {
    // Listing never runs pulp-admin
    let reconciler = create_reconciler(config, false)?;
    let records = reconciler
        .list()
        .await
        .context("Failed to list repositories")?;

    let states: Vec<CanonicalState> = records
        .iter()
        .map(|r| CanonicalState::Present(r.redacted()))
        .collect();

    let rendered = match output {
        OutputFormat::Yaml => serde_yaml::to_string(&states).context("Failed to render YAML")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&states).context("Failed to render JSON")?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
