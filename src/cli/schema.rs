//! # Schema Command

use crate::resource::DesiredStateFile;
use anyhow::{Context, Result};

/// Print the JSON Schema of the desired-state document
pub fn schema_command() -> Result<()> {
    let schema = schemars::schema_for!(DesiredStateFile);
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?
    );
    Ok(())
}
