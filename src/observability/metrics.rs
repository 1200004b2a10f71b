//! # Metrics
//!
//! Prometheus metrics for monitoring reconciliation runs.
//!
//! The controller runs to completion rather than serving, so the registry is
//! written in text exposition format to a file at the end of a run, for the
//! node-exporter textfile collector.
//!
//! ## Metrics Exposed
//!
//! - `pulp_repo_reconciliations_total` - Total number of repository reconciliations
//! - `pulp_repo_reconciliation_errors_total` - Total number of failed repository reconciliations
//! - `pulp_repo_reconciliation_duration_seconds` - Duration of each repository commit (command plus re-read)
//! - `pulp_repo_commands_total` - pulp-admin invocations by verb
//! - `pulp_repo_command_errors_total` - failed pulp-admin invocations by verb
//! - `pulp_repo_inventory_size` - RPM repositories found in the last inventory fetch
//! - `pulp_repo_drift_detected_total` - Properties found out of sync

use anyhow::{Context, Result};
use prometheus::{Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, Registry, TextEncoder};
use std::path::Path;
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pulp_repo_reconciliations_total",
        "Total number of repository reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pulp_repo_reconciliation_errors_total",
        "Total number of failed repository reconciliations",
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "pulp_repo_reconciliation_duration_seconds",
            "Duration of each repository commit, including the re-read, in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static COMMANDS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "pulp_repo_commands_total",
            "Total number of pulp-admin invocations by verb",
        ),
        &["verb"],
    )
    .expect("Failed to create COMMANDS_TOTAL metric - this should never happen")
});

static COMMAND_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "pulp_repo_command_errors_total",
            "Total number of failed pulp-admin invocations by verb",
        ),
        &["verb"],
    )
    .expect("Failed to create COMMAND_ERRORS_TOTAL metric - this should never happen")
});

static INVENTORY_SIZE: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "pulp_repo_inventory_size",
        "Number of RPM repositories found in the last inventory fetch",
    )
    .expect("Failed to create INVENTORY_SIZE metric - this should never happen")
});

static DRIFT_DETECTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pulp_repo_drift_detected_total",
        "Total number of repository properties found out of sync",
    )
    .expect("Failed to create DRIFT_DETECTED_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(COMMANDS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(COMMAND_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(INVENTORY_SIZE.clone()))?;
    REGISTRY.register(Box::new(DRIFT_DETECTED_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors() {
    RECONCILIATION_ERRORS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_commands(verb: &str) {
    COMMANDS_TOTAL.with_label_values(&[verb]).inc();
}

pub fn increment_command_errors(verb: &str) {
    COMMAND_ERRORS_TOTAL.with_label_values(&[verb]).inc();
}

pub fn set_inventory_size(count: usize) {
    INVENTORY_SIZE.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn increment_drift_detected(count: usize) {
    DRIFT_DETECTED_TOTAL.inc_by(u64::try_from(count).unwrap_or(u64::MAX));
}

/// Render all registered metrics in Prometheus text format
///
/// # Errors
/// Returns an error if encoding fails.
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not valid UTF-8")
}

/// Write metrics for the textfile collector
///
/// Writes to a sibling temp file first and renames it so the collector never
/// reads a partial file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_textfile(path: &Path) -> Result<()> {
    let rendered = render()?;
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, rendered)
        .with_context(|| format!("Failed to write metrics to {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move metrics into place at {}", path.display()))?;
    Ok(())
}
