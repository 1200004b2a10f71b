//! # Run Report
//!
//! Result of one reconciliation run, printed by the CLI as text or JSON.

use super::types::{Action, RunMode};
use crate::resource::Property;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// What happened to one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The command ran and the repository was re-read
    Applied,
    /// Already in sync
    Unchanged,
    /// Dry run; arguments are redacted
    Planned { args: Vec<(String, String)> },
    /// The executor's message, verbatim
    Failed { error: String },
}

impl Outcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Applied => "applied",
            Outcome::Unchanged => "unchanged",
            Outcome::Planned { .. } => "planned",
            Outcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    pub name: String,
    pub action: Action,
    /// Drifted property names; values are never reported
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drift: Vec<Property>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub repos: Vec<RepoReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(mode: RunMode) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            mode,
            started_at: now,
            finished_at: now,
            repos: Vec::new(),
        }
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.repos.iter().filter(|r| r.outcome.is_failure()).count()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RepoReport> {
        self.repos.iter().find(|r| r.name == name)
    }

    /// Counts per outcome, e.g. `2 applied, 1 unchanged, 0 failed`
    #[must_use]
    pub fn summary(&self) -> String {
        let count = |s: &str| self.repos.iter().filter(|r| r.outcome.as_str() == s).count();
        match self.mode {
            RunMode::Apply => format!(
                "{} applied, {} unchanged, {} failed",
                count("applied"),
                count("unchanged"),
                count("failed")
            ),
            RunMode::Plan => format!(
                "{} planned, {} unchanged",
                count("planned"),
                count("unchanged")
            ),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Run {} ({}), {} to {}",
            self.run_id,
            match self.mode {
                RunMode::Apply => "apply",
                RunMode::Plan => "plan",
            },
            self.started_at.to_rfc3339(),
            self.finished_at.to_rfc3339()
        )?;
        for repo in &self.repos {
            write!(f, "  {:<24} {:<7} {:<9}", repo.name, repo.action, repo.outcome.as_str())?;
            if !repo.drift.is_empty() {
                let names: Vec<&str> = repo.drift.iter().map(|p| p.name()).collect();
                write!(f, " drift: {}", names.join(", "))?;
            }
            match &repo.outcome {
                Outcome::Failed { error } => write!(f, "\n    error: {error}")?,
                Outcome::Planned { args } if !args.is_empty() => {
                    let shown: Vec<String> =
                        args.iter().map(|(flag, value)| format!("{flag} {value:?}")).collect();
                    write!(f, "\n    {}", shown.join(" "))?;
                }
                _ => {}
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.summary())
    }
}
