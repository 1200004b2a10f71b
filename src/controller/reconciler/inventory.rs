//! # Inventory
//!
//! A snapshot of the RPM repositories on the server, fetched once per run.
//!
//! Pulp keeps every plugin family in one repository collection. Only records
//! whose `_repo-type` note is `rpm-repo` belong to this controller; the rest
//! are dropped before normalization.

use super::binding::Binding;
use super::normalize::normalize;
use crate::constants::{REPO_TYPE_NOTE_KEY, RPM_REPO_TYPE};
use crate::observability::metrics;
use crate::provider::{InventoryFetchError, InventoryLister, RawRepo};
use crate::resource::{CanonicalState, DesiredRepo, RepoRecord};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Whether a raw record is an RPM repository
#[must_use]
pub fn is_rpm_repo(raw: &RawRepo) -> bool {
    raw.note(REPO_TYPE_NOTE_KEY).as_deref() == Some(RPM_REPO_TYPE)
}

/// List every RPM repository in canonical form
///
/// # Errors
/// Any listing failure is returned; a partial inventory is never produced.
pub async fn list(lister: &dyn InventoryLister) -> Result<Vec<RepoRecord>, InventoryFetchError> {
    let raw = lister.list_all().await?;
    let total = raw.len();
    let records: Vec<RepoRecord> = raw
        .iter()
        .filter(|r| is_rpm_repo(r))
        .filter_map(|r| match normalize(&r.id, Some(r)) {
            CanonicalState::Present(record) => Some(record),
            CanonicalState::Absent => None,
        })
        .collect();
    debug!(
        "Listed {} repositories, {} of type {}",
        total,
        records.len(),
        RPM_REPO_TYPE
    );
    Ok(records)
}

/// Canonical state of every RPM repository at one point in time
#[derive(Debug, Clone)]
pub struct Inventory {
    records: BTreeMap<String, RepoRecord>,
}

impl Inventory {
    /// Fetch the snapshot
    ///
    /// # Errors
    /// Returns the listing failure; callers must not reconcile without an
    /// inventory.
    pub async fn fetch(lister: &dyn InventoryLister) -> Result<Self, InventoryFetchError> {
        let inventory = Self::from_records(list(lister).await?);
        metrics::set_inventory_size(inventory.len());
        info!("Fetched inventory of {} RPM repositories", inventory.len());
        Ok(inventory)
    }

    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = RepoRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Canonical state of `repo_id`; absent when not in the snapshot
    #[must_use]
    pub fn get(&self, repo_id: &str) -> CanonicalState {
        self.records
            .get(repo_id)
            .cloned()
            .map_or(CanonicalState::Absent, CanonicalState::Present)
    }

    /// Pair a desired repository with its canonical state
    #[must_use]
    pub fn bind(&self, desired: DesiredRepo) -> Binding {
        let current = self.get(&desired.name);
        Binding::new(desired, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::RepoProperties;

    fn raw(id: &str, repo_type: Option<&str>) -> RawRepo {
        let mut repo = RawRepo {
            id: id.to_string(),
            ..RawRepo::default()
        };
        if let Some(t) = repo_type {
            repo.notes
                .insert(REPO_TYPE_NOTE_KEY.to_string(), serde_json::json!(t));
        }
        repo
    }

    #[test]
    fn test_type_marker_filter() {
        assert!(is_rpm_repo(&raw("epel7", Some("rpm-repo"))));
        assert!(!is_rpm_repo(&raw("isos", Some("iso-repo"))));
        assert!(!is_rpm_repo(&raw("bare", None)));
    }

    #[test]
    fn test_get_and_bind() {
        let inventory = Inventory::from_records([RepoRecord {
            name: "epel7".to_string(),
            properties: RepoProperties::default(),
        }]);
        assert_eq!(inventory.len(), 1);
        assert!(inventory.get("epel7").exists());
        assert_eq!(inventory.get("missing"), CanonicalState::Absent);

        let binding = inventory.bind(DesiredRepo::absent("missing"));
        assert!(!binding.exists());
    }
}
