//! # Reconciliation Run
//!
//! One run reconciles a whole desired-state document in two phases:
//!
//! 1. Observe and decide: validate the document, fetch the inventory once,
//!    bind every repository and decide its action.
//! 2. Act: commit each binding in document order. A failed commit is
//!    recorded and the run moves on to the next repository.
//!
//! Every decision is made before the first mutation, so no decision is
//! based on an inventory that is changing underneath it.

use super::binding::Binding;
use super::inventory::{self, Inventory};
use super::report::{Outcome, RepoReport, RunReport};
use super::types::{Action, ReconcileError, RunMode};
use super::validation::validate_desired_state;
use crate::observability::metrics;
use crate::provider::{CommandExecutor, InventoryLister};
use crate::resource::{DesiredRepo, Property, RepoRecord};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

#[derive(Clone)]
pub struct Reconciler {
    executor: Arc<dyn CommandExecutor>,
    lister: Arc<dyn InventoryLister>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>, lister: Arc<dyn InventoryLister>) -> Self {
        Self { executor, lister }
    }

    /// Canonical records of every RPM repository on the server
    ///
    /// # Errors
    /// Returns the listing failure.
    pub async fn list(&self) -> Result<Vec<RepoRecord>, ReconcileError> {
        Ok(inventory::list(self.lister.as_ref()).await?)
    }

    /// Reconcile `desired` against the server
    ///
    /// Per-repository failures are reported in the returned [`RunReport`].
    ///
    /// # Errors
    /// Fails before any mutation when the document is invalid or the
    /// inventory cannot be fetched.
    pub async fn run(
        &self,
        desired: Vec<DesiredRepo>,
        mode: RunMode,
    ) -> Result<RunReport, ReconcileError> {
        let report = RunReport::new(mode);
        let span = info_span!("reconcile_run", run_id = %report.run_id, mode = ?mode);
        self.run_inner(desired, report).instrument(span).await
    }

    async fn run_inner(
        &self,
        desired: Vec<DesiredRepo>,
        mut report: RunReport,
    ) -> Result<RunReport, ReconcileError> {
        info!("Reconciling {} repositories", desired.len());

        validate_desired_state(&desired).inspect_err(|e| error!("Validation error: {}", e))?;
        let inventory = Inventory::fetch(self.lister.as_ref())
            .await
            .inspect_err(|e| error!("Aborting run: {}", e))?;

        let decided: Vec<Decision> = desired
            .into_iter()
            .map(|repo| Decision::new(inventory.bind(repo)))
            .collect();
        drop(inventory);

        for decision in decided {
            let entry = match report.mode {
                RunMode::Plan => decision.plan(),
                RunMode::Apply => {
                    let span = info_span!("commit", repo_id = %decision.binding.name());
                    self.apply(decision).instrument(span).await
                }
            };
            report.repos.push(entry);
        }

        report.finished_at = Utc::now();
        if report.is_success() {
            info!("Run finished: {}", report.summary());
        } else {
            warn!("Run finished with failures: {}", report.summary());
        }
        Ok(report)
    }

    async fn apply(&self, decision: Decision) -> RepoReport {
        let Decision {
            mut binding,
            action,
            drift,
            error,
        } = decision;
        let name = binding.name().to_string();
        if let Some(message) = error {
            return RepoReport {
                name,
                action,
                drift,
                outcome: Outcome::Failed { error: message },
            };
        }

        let start = Instant::now();
        metrics::increment_reconciliations();
        let outcome = match binding
            .commit(self.executor.as_ref(), self.lister.as_ref())
            .await
        {
            Ok(Some(_)) => Outcome::Applied,
            Ok(None) => Outcome::Unchanged,
            Err(e) => {
                metrics::increment_reconciliation_errors();
                error!("Failed to {} repository {}: {}", action, name, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        RepoReport {
            name,
            action,
            drift,
            outcome,
        }
    }
}

/// A binding with its action decided
struct Decision {
    binding: Binding,
    action: Action,
    drift: Vec<Property>,
    error: Option<String>,
}

impl Decision {
    fn new(mut binding: Binding) -> Self {
        let drift = binding.drift();
        if !drift.is_empty() {
            metrics::increment_drift_detected(drift.len());
        }
        let (action, error) = match binding.decide() {
            Ok(action) => (action, None),
            Err(e) => (Action::None, Some(e.to_string())),
        };
        info!(
            repo_id = %binding.name(),
            action = %action,
            drifted = drift.len(),
            "Decided action for repository {}",
            binding.name()
        );
        Self {
            binding,
            action,
            drift,
            error,
        }
    }

    fn plan(self) -> RepoReport {
        let outcome = match (self.error, self.binding.plan()) {
            (Some(message), _) => Outcome::Failed { error: message },
            (None, Some(mutation)) => Outcome::Planned {
                args: mutation.redacted_args(),
            },
            (None, None) => Outcome::Unchanged,
        };
        RepoReport {
            name: self.binding.name().to_string(),
            action: self.action,
            drift: self.drift,
            outcome,
        }
    }
}
