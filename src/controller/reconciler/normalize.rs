//! # Canonical State Mapping
//!
//! Normalizes a raw Pulp repository into a [`CanonicalState`].
//!
//! Top-level fields (display name, description, notes) come from the
//! repository itself. Publishing properties come from the `yum_distributor`
//! config and sync properties from the `yum_importer` config. Several keys
//! are renamed on the way:
//!
//! | config key        | property        |
//! |-------------------|-----------------|
//! | `http` / `https`  | `serve_http` / `serve_https` |
//! | `gpgkey`          | `gpg_key`       |
//! | `https_ca`        | `host_ca`       |
//! | `ssl_ca_cert`     | `feed_ca_cert`  |
//! | `ssl_validation`  | `verify_feed_ssl` |
//! | `ssl_client_cert` / `ssl_client_key` | `feed_cert` / `feed_key` |
//! | `proxy_username` / `proxy_password`  | `proxy_user` / `proxy_pass` |
//! | `type_skip_list`  | `skip`          |
//!
//! Malformed values degrade to "not set" with a warning; they never abort
//! the run.

use crate::constants::{REPO_TYPE_NOTE_KEY, YUM_DISTRIBUTOR_ID, YUM_IMPORTER_ID};
use crate::provider::pulp::responses::value_to_text;
use crate::provider::{RawPlugin, RawRepo};
use crate::resource::{CanonicalState, RepoProperties, RepoRecord, TriState};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Map a raw record (or its absence) to canonical state
///
/// The requested id is echoed back as the record name.
#[must_use]
pub fn normalize(repo_id: &str, raw: Option<&RawRepo>) -> CanonicalState {
    let Some(raw) = raw else {
        return CanonicalState::Absent;
    };

    let mut properties = RepoProperties {
        display_name: raw.display_name.clone(),
        description: raw.description.clone(),
        note: Some(
            raw.notes
                .iter()
                .filter(|(key, _)| key.as_str() != REPO_TYPE_NOTE_KEY)
                .filter_map(|(key, value)| value_to_text(value).map(|v| (key.clone(), v)))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..RepoProperties::default()
    };

    // Fields of a missing plugin stay unset rather than defaulting
    if let Some(distributor) = raw.distributor(YUM_DISTRIBUTOR_ID) {
        properties.relative_url = text(distributor, "relative_url");
        properties.serve_http = truthy(distributor, "http");
        properties.serve_https = truthy(distributor, "https");
        properties.checksum_type = text(distributor, "checksum_type");
        properties.gpg_key = text(distributor, "gpgkey");
        properties.generate_sqlite = truthy(distributor, "generate_sqlite");
        properties.host_ca = text(distributor, "https_ca");
        properties.auth_ca = text(distributor, "auth_ca");
        properties.auth_cert = text(distributor, "auth_cert");
    }

    if let Some(importer) = raw.importer(YUM_IMPORTER_ID) {
        properties.feed = Some(text(importer, "feed").unwrap_or_default());
        properties.validate = truthy(importer, "validate");
        properties.skip = list(repo_id, importer, "type_skip_list");
        properties.feed_ca_cert = text(importer, "ssl_ca_cert");
        properties.verify_feed_ssl = truthy(importer, "ssl_validation");
        properties.feed_cert = text(importer, "ssl_client_cert");
        properties.feed_key = text(importer, "ssl_client_key");
        properties.proxy_host = text(importer, "proxy_host");
        properties.proxy_port = integer(repo_id, importer, "proxy_port");
        properties.proxy_user = text(importer, "proxy_username");
        properties.proxy_pass = text(importer, "proxy_password");
        properties.max_downloads = integer(repo_id, importer, "max_downloads");
        properties.max_speed = integer(repo_id, importer, "max_speed");
        properties.remove_missing = truthy(importer, "remove_missing");
        properties.retain_old_count = integer(repo_id, importer, "retain_old_count");
    }

    CanonicalState::Present(RepoRecord {
        name: repo_id.to_string(),
        properties,
    })
}

fn text(plugin: &RawPlugin, key: &str) -> Option<String> {
    plugin.config.get(key).and_then(value_to_text)
}

/// Presence of a config key as an explicit boolean
///
/// Missing, null and `false` (or the string "false") are false; any other
/// value is true.
fn truthy(plugin: &RawPlugin, key: &str) -> TriState {
    let on = match plugin.config.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.eq_ignore_ascii_case("false"),
        Some(_) => true,
    };
    on.into()
}

fn integer(repo_id: &str, plugin: &RawPlugin, key: &str) -> Option<u64> {
    let value = plugin.config.get(key)?;
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(
            "Ignoring non-numeric {} '{}' on repository {}",
            key, value, repo_id
        );
    }
    parsed
}

fn list(repo_id: &str, plugin: &RawPlugin, key: &str) -> Option<Vec<String>> {
    match plugin.config.get(key)? {
        Value::Null => None,
        Value::Array(items) => Some(items.iter().filter_map(value_to_text).collect()),
        Value::String(s) if s.is_empty() => Some(Vec::new()),
        Value::String(s) => Some(s.split(',').map(|i| i.trim().to_string()).collect()),
        other => {
            warn!(
                "Ignoring malformed {} '{}' on repository {}",
                key, other, repo_id
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRepo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_record() {
        assert_eq!(normalize("epel7", None), CanonicalState::Absent);
    }

    #[test]
    fn test_full_record() {
        let repo = raw(json!({
            "id": "epel7",
            "display_name": "EPEL 7",
            "description": "Extra packages",
            "notes": { "_repo-type": "rpm-repo", "owner": "infra" },
            "importers": [{ "id": "yum_importer", "config": {
                "feed": "https://dl.fedoraproject.org/pub/epel/7/x86_64/",
                "validate": true,
                "type_skip_list": ["erratum", "drpm"],
                "ssl_validation": false,
                "ssl_ca_cert": "CA CONTENT",
                "proxy_host": "proxy.example.org",
                "proxy_port": 3128,
                "proxy_username": "bob",
                "proxy_password": "hunter2",
                "max_downloads": "4",
                "remove_missing": true,
                "retain_old_count": 2
            }}],
            "distributors": [{ "id": "yum_distributor", "config": {
                "relative_url": "epel/7",
                "http": false,
                "https": true,
                "checksum_type": "sha256",
                "gpgkey": "KEY",
                "https_ca": "HOST CA"
            }}]
        }));

        let state = normalize("epel7", Some(&repo));
        let record = state.record().unwrap();
        let p = &record.properties;
        assert_eq!(record.name, "epel7");
        assert_eq!(p.display_name.as_deref(), Some("EPEL 7"));
        assert_eq!(
            p.note,
            Some([("owner".to_string(), "infra".to_string())].into_iter().collect())
        );
        assert_eq!(p.validate, TriState::True);
        assert_eq!(p.skip, Some(vec!["erratum".to_string(), "drpm".to_string()]));
        assert_eq!(p.verify_feed_ssl, TriState::False);
        assert_eq!(p.feed_ca_cert.as_deref(), Some("CA CONTENT"));
        assert_eq!(p.proxy_port, Some(3128));
        assert_eq!(p.proxy_user.as_deref(), Some("bob"));
        assert_eq!(p.proxy_pass.as_deref(), Some("hunter2"));
        assert_eq!(p.max_downloads, Some(4));
        assert_eq!(p.retain_old_count, Some(2));
        assert_eq!(p.relative_url.as_deref(), Some("epel/7"));
        assert_eq!(p.serve_http, TriState::False);
        assert_eq!(p.serve_https, TriState::True);
        assert_eq!(p.gpg_key.as_deref(), Some("KEY"));
        assert_eq!(p.host_ca.as_deref(), Some("HOST CA"));
        // Not present in config
        assert_eq!(p.generate_sqlite, TriState::False);
        assert_eq!(p.max_speed, None);
    }

    #[test]
    fn test_bare_record_leaves_plugin_fields_unset() {
        let repo = raw(json!({ "id": "bare", "notes": { "_repo-type": "rpm-repo" } }));
        let p = normalize("bare", Some(&repo)).properties().cloned().unwrap();
        assert_eq!(p.note, Some(BTreeMap::new()));
        assert_eq!(p.feed, None);
        assert_eq!(p.validate, TriState::Unset);
        assert_eq!(p.serve_http, TriState::Unset);
        assert_eq!(p.skip, None);
        assert_eq!(p.gpg_key, None);
    }

    #[test]
    fn test_other_plugin_roles_are_ignored() {
        let repo = raw(json!({
            "id": "mixed",
            "importers": [{ "id": "iso_importer", "config": { "feed": "http://iso" } }],
            "distributors": [{ "id": "export_distributor", "config": {
                "http": true,
                "relative_url": "export"
            }}]
        }));
        let p = normalize("mixed", Some(&repo)).properties().cloned().unwrap();
        assert_eq!(p.feed, None);
        assert_eq!(p.validate, TriState::Unset);
        assert_eq!(p.remove_missing, TriState::Unset);
        assert_eq!(p.serve_http, TriState::Unset);
        assert_eq!(p.generate_sqlite, TriState::Unset);
        assert_eq!(p.relative_url, None);
    }

    #[test]
    fn test_importer_without_feed_defaults_to_empty() {
        let repo = raw(json!({
            "id": "local",
            "importers": [{ "id": "yum_importer", "config": {} }]
        }));
        let p = normalize("local", Some(&repo)).properties().cloned().unwrap();
        assert_eq!(p.feed.as_deref(), Some(""));
        assert_eq!(p.validate, TriState::False);
        assert_eq!(p.serve_http, TriState::Unset);
    }

    #[test]
    fn test_malformed_values_degrade() {
        let repo = raw(json!({
            "id": "odd",
            "importers": [{ "id": "yum_importer", "config": {
                "proxy_port": "not-a-port",
                "max_speed": -1,
                "type_skip_list": 7,
                "validate": "false"
            }}]
        }));
        let p = normalize("odd", Some(&repo)).properties().cloned().unwrap();
        assert_eq!(p.proxy_port, None);
        assert_eq!(p.max_speed, None);
        assert_eq!(p.skip, None);
        assert_eq!(p.validate, TriState::False);
    }

    #[test]
    fn test_name_echoes_requested_id() {
        let repo = raw(json!({ "id": "server-side-id" }));
        let state = normalize("requested", Some(&repo));
        assert_eq!(state.record().unwrap().name, "requested");
    }
}
