//! # Canonical State
//!
//! The normalized view of what currently exists on the Pulp server.

use super::property::Property;
use super::spec::RepoProperties;
use crate::constants::REDACTED;
use crate::controller::reconciler::secrets::fingerprint;
use serde::Serialize;

/// A repository as it exists remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRecord {
    /// Repository id
    pub name: String,
    #[serde(flatten)]
    pub properties: RepoProperties,
}

impl RepoRecord {
    /// Copy safe for display: secret contents become fingerprints, the proxy
    /// password is masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for property in Property::SECRET_FILES {
            if let Some(slot) = copy.properties.secret_mut(property) {
                if let Some(content) = slot.take() {
                    *slot = Some(fingerprint(&content));
                }
            }
        }
        if copy.properties.proxy_pass.is_some() {
            copy.properties.proxy_pass = Some(REDACTED.to_string());
        }
        copy
    }
}

/// Canonical state of one repository id
///
/// Serializes with an `ensure` tag; an absent repository carries no other
/// fields, so callers can never mistake it for a present one with blank values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "ensure", rename_all = "lowercase")]
pub enum CanonicalState {
    Absent,
    Present(RepoRecord),
}

impl CanonicalState {
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self, CanonicalState::Present(_))
    }

    #[must_use]
    pub fn record(&self) -> Option<&RepoRecord> {
        match self {
            CanonicalState::Present(record) => Some(record),
            CanonicalState::Absent => None,
        }
    }

    /// Properties of a present repository; empty for an absent one
    #[must_use]
    pub fn properties(&self) -> Option<&RepoProperties> {
        self.record().map(|r| &r.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::TriState;

    #[test]
    fn test_absent_serializes_to_ensure_only() {
        let value = serde_json::to_value(CanonicalState::Absent).unwrap();
        assert_eq!(value, serde_json::json!({ "ensure": "absent" }));
    }

    #[test]
    fn test_present_serializes_flat() {
        let state = CanonicalState::Present(RepoRecord {
            name: "epel".to_string(),
            properties: RepoProperties {
                feed: Some(String::new()),
                serve_http: TriState::True,
                ..RepoProperties::default()
            },
        });
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ensure": "present",
                "name": "epel",
                "feed": "",
                "serve_http": true,
            })
        );
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let record = RepoRecord {
            name: "epel".to_string(),
            properties: RepoProperties {
                gpg_key: Some("-----BEGIN PGP PUBLIC KEY BLOCK-----".to_string()),
                proxy_pass: Some("hunter2".to_string()),
                ..RepoProperties::default()
            },
        };
        let redacted = record.redacted();
        let gpg = redacted.properties.gpg_key.unwrap();
        assert!(gpg.starts_with("sha256:"));
        assert!(!gpg.contains("PGP"));
        assert_eq!(redacted.properties.proxy_pass.as_deref(), Some(REDACTED));
        assert_eq!(record.properties.proxy_pass.as_deref(), Some("hunter2"));
    }
}
