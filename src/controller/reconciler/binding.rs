//! # Binding
//!
//! Pairs one desired repository with its canonical state and holds the
//! mutation queued for it.
//!
//! ```text
//! ABSENT --create--> (pending create) --commit--> PRESENT
//! PRESENT --destroy--> (pending delete) --commit--> ABSENT
//! PRESENT + drift --commit--> update
//! ```
//!
//! Nothing reaches the server before [`Binding::commit`]. After a successful
//! command the canonical state is always re-read; the local prediction of
//! what the command did is never used.

use super::marshal::{marshal_properties, redact};
use super::normalize::normalize;
use super::secrets::comparable_view;
use super::types::{Action, ReconcileError};
use crate::provider::{CommandExecutor, InventoryLister, Verb};
use crate::resource::{CanonicalState, DesiredRepo, Ensure, Property};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    Absent,
    PresentClean,
    /// Pending changes queued or drift detected
    PresentDirty,
}

/// Queued ensure change; field-level updates are inferred at commit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingMutation {
    ensure: Option<Ensure>,
}

impl PendingMutation {
    #[must_use]
    pub fn ensure(&self) -> Option<Ensure> {
        self.ensure
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ensure.is_none()
    }
}

/// One executor invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutation {
    pub verb: Verb,
    pub repo_id: String,
    pub args: Vec<(String, String)>,
}

impl Mutation {
    /// Arguments with sensitive values masked
    #[must_use]
    pub fn redacted_args(&self) -> Vec<(String, String)> {
        redact(&self.args)
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    desired: DesiredRepo,
    current: CanonicalState,
    pending: PendingMutation,
}

impl Binding {
    #[must_use]
    pub fn new(desired: DesiredRepo, current: CanonicalState) -> Self {
        Self {
            desired,
            current,
            pending: PendingMutation::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.desired.name
    }

    #[must_use]
    pub fn desired(&self) -> &DesiredRepo {
        &self.desired
    }

    #[must_use]
    pub fn current(&self) -> &CanonicalState {
        &self.current
    }

    #[must_use]
    pub fn pending(&self) -> PendingMutation {
        self.pending
    }

    /// Whether the repository exists remotely
    #[must_use]
    pub fn exists(&self) -> bool {
        self.current.exists()
    }

    /// Declared properties whose value differs from canonical state
    ///
    /// Empty when the repository is absent or declared absent.
    #[must_use]
    pub fn drift(&self) -> Vec<Property> {
        let Some(current) = self.current.properties() else {
            return Vec::new();
        };
        if self.desired.ensure == Ensure::Absent {
            return Vec::new();
        }
        let desired = &self.desired.properties;
        let view = comparable_view(desired, current);
        Property::ALL
            .into_iter()
            .filter(|&p| match desired.get(p) {
                Some(want) => view.get(p).as_ref() != Some(&want),
                None => false,
            })
            .collect()
    }

    #[must_use]
    pub fn state(&self) -> BindingState {
        if !self.exists() {
            BindingState::Absent
        } else if !self.pending.is_empty() || !self.drift().is_empty() {
            BindingState::PresentDirty
        } else {
            BindingState::PresentClean
        }
    }

    /// Queue creation
    ///
    /// # Errors
    /// Fails when the repository already exists.
    pub fn create(&mut self) -> Result<(), ReconcileError> {
        if self.exists() {
            return Err(self.invalid_transition("create", "present"));
        }
        self.pending.ensure = Some(Ensure::Present);
        Ok(())
    }

    /// Queue deletion
    ///
    /// # Errors
    /// Fails when the repository does not exist.
    pub fn destroy(&mut self) -> Result<(), ReconcileError> {
        if !self.exists() {
            return Err(self.invalid_transition("destroy", "absent"));
        }
        self.pending.ensure = Some(Ensure::Absent);
        Ok(())
    }

    fn invalid_transition(&self, operation: &'static str, state: &'static str) -> ReconcileError {
        ReconcileError::InvalidTransition {
            repo_id: self.desired.name.clone(),
            operation,
            state,
        }
    }

    /// Queue whatever the declared `ensure` requires and report the action
    ///
    /// # Errors
    /// Propagates an invalid transition, which only happens when a mutation
    /// was already queued by hand.
    pub fn decide(&mut self) -> Result<Action, ReconcileError> {
        match (self.desired.ensure, self.exists()) {
            (Ensure::Present, false) if self.pending.is_empty() => self.create()?,
            (Ensure::Absent, true) if self.pending.is_empty() => self.destroy()?,
            _ => {}
        }
        Ok(self.plan().map(|m| m.verb).into())
    }

    /// The invocation a commit would perform, if any
    ///
    /// Depends only on desired state, canonical state and the queued ensure.
    #[must_use]
    pub fn plan(&self) -> Option<Mutation> {
        let verb = match self.pending.ensure {
            Some(Ensure::Present) => Verb::Create,
            Some(Ensure::Absent) => Verb::Delete,
            None if self.desired.ensure == Ensure::Present
                && self.exists()
                && !self.drift().is_empty() =>
            {
                Verb::Update
            }
            None => return None,
        };
        // Deletion needs nothing but the id
        let args = match verb {
            Verb::Delete => Vec::new(),
            Verb::Create | Verb::Update => marshal_properties(&self.desired.properties),
        };
        Some(Mutation {
            verb,
            repo_id: self.desired.name.clone(),
            args,
        })
    }

    /// Apply the queued mutation and re-read the repository
    ///
    /// Returns the verb that ran, or `None` when there was nothing to do.
    ///
    /// # Errors
    /// On executor failure the pending mutation is kept and the executor's
    /// error is returned unchanged. A failed re-read after a successful
    /// command clears the pending mutation but leaves the canonical state
    /// as it was.
    pub async fn commit(
        &mut self,
        executor: &dyn CommandExecutor,
        lister: &dyn InventoryLister,
    ) -> Result<Option<Verb>, ReconcileError> {
        let Some(mutation) = self.plan() else {
            debug!("Repository {} is in sync, nothing to commit", self.name());
            return Ok(None);
        };

        executor
            .invoke(mutation.verb, &mutation.repo_id, &mutation.args)
            .await
            .map_err(|source| ReconcileError::Execution {
                repo_id: mutation.repo_id.clone(),
                verb: mutation.verb,
                source,
            })?;
        self.pending = PendingMutation::default();

        let raw = lister
            .get_one(&mutation.repo_id)
            .await
            .map_err(|source| ReconcileError::Refresh {
                repo_id: mutation.repo_id.clone(),
                verb: mutation.verb,
                source,
            })?;
        self.current = normalize(&mutation.repo_id, raw.as_ref());

        info!(
            "Committed {} for repository {} (now {})",
            mutation.verb,
            mutation.repo_id,
            if self.exists() { "present" } else { "absent" }
        );
        Ok(Some(mutation.verb))
    }
}
