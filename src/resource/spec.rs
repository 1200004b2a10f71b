//! # Desired State
//!
//! The declared configuration of RPM repositories, as read from the
//! desired-state document.

use super::property::{de, Property, PropertyValue, TriState};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a repository should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

/// Property values of one repository
///
/// Used for both sides of a comparison. In desired state the secret-file
/// properties hold local file paths; in canonical state they hold the content
/// last stored on the server. Every field is optional: absent means
/// "not managed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct RepoProperties {
    /// User-friendly name of the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form notes, written as repeated `--note key=value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<BTreeMap<String, String>>,
    /// Upstream URL to sync from; an empty string means "no feed"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
    /// Validate size and checksum of synced content
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub validate: TriState,
    /// Content types to skip during sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_ca_cert: Option<String>,
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub verify_feed_ssl: TriState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_host: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u64>")]
    pub proxy_port: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_pass: Option<String>,
    /// Number of concurrent downloads during sync
    #[serde(
        default,
        deserialize_with = "de::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u64>")]
    pub max_downloads: Option<u64>,
    /// Bandwidth limit per download thread (KB/s)
    #[serde(
        default,
        deserialize_with = "de::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u64>")]
    pub max_speed: Option<u64>,
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub remove_missing: TriState,
    #[serde(
        default,
        deserialize_with = "de::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u64>")]
    pub retain_old_count: Option<u64>,
    /// Path the repository is published under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_url: Option<String>,
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub serve_http: TriState,
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub serve_https: TriState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpg_key: Option<String>,
    #[serde(default, skip_serializing_if = "TriState::is_unset")]
    #[schemars(with = "Option<bool>")]
    pub generate_sqlite: TriState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_cert: Option<String>,
}

impl RepoProperties {
    /// Value of a property, `None` when it is absent or unset
    #[must_use]
    pub fn get(&self, property: Property) -> Option<PropertyValue> {
        fn text(v: &Option<String>) -> Option<PropertyValue> {
            v.clone().map(PropertyValue::Text)
        }
        fn int(v: Option<u64>) -> Option<PropertyValue> {
            v.map(PropertyValue::Integer)
        }
        fn flag(v: TriState) -> Option<PropertyValue> {
            (!v.is_unset()).then_some(PropertyValue::Bool(v))
        }

        match property {
            Property::DisplayName => text(&self.display_name),
            Property::Description => text(&self.description),
            Property::Note => self.note.clone().map(PropertyValue::Map),
            Property::Feed => text(&self.feed),
            Property::Validate => flag(self.validate),
            Property::Skip => self.skip.clone().map(PropertyValue::List),
            Property::FeedCaCert => text(&self.feed_ca_cert),
            Property::VerifyFeedSsl => flag(self.verify_feed_ssl),
            Property::FeedCert => text(&self.feed_cert),
            Property::FeedKey => text(&self.feed_key),
            Property::ProxyHost => text(&self.proxy_host),
            Property::ProxyPort => int(self.proxy_port),
            Property::ProxyUser => text(&self.proxy_user),
            Property::ProxyPass => text(&self.proxy_pass),
            Property::MaxDownloads => int(self.max_downloads),
            Property::MaxSpeed => int(self.max_speed),
            Property::RemoveMissing => flag(self.remove_missing),
            Property::RetainOldCount => int(self.retain_old_count),
            Property::RelativeUrl => text(&self.relative_url),
            Property::ServeHttp => flag(self.serve_http),
            Property::ServeHttps => flag(self.serve_https),
            Property::ChecksumType => text(&self.checksum_type),
            Property::GpgKey => text(&self.gpg_key),
            Property::GenerateSqlite => flag(self.generate_sqlite),
            Property::HostCa => text(&self.host_ca),
            Property::AuthCa => text(&self.auth_ca),
            Property::AuthCert => text(&self.auth_cert),
        }
    }

    /// Text value of a secret-file property (path or content depending on side)
    #[must_use]
    pub fn secret(&self, property: Property) -> Option<&str> {
        let value = match property {
            Property::FeedCaCert => &self.feed_ca_cert,
            Property::FeedCert => &self.feed_cert,
            Property::FeedKey => &self.feed_key,
            Property::GpgKey => &self.gpg_key,
            Property::HostCa => &self.host_ca,
            Property::AuthCa => &self.auth_ca,
            Property::AuthCert => &self.auth_cert,
            _ => return None,
        };
        value.as_deref()
    }

    /// Mutable slot of a secret-file property
    pub(crate) fn secret_mut(&mut self, property: Property) -> Option<&mut Option<String>> {
        match property {
            Property::FeedCaCert => Some(&mut self.feed_ca_cert),
            Property::FeedCert => Some(&mut self.feed_cert),
            Property::FeedKey => Some(&mut self.feed_key),
            Property::GpgKey => Some(&mut self.gpg_key),
            Property::HostCa => Some(&mut self.host_ca),
            Property::AuthCa => Some(&mut self.auth_ca),
            Property::AuthCert => Some(&mut self.auth_cert),
            _ => None,
        }
    }

    /// Properties that carry a value
    pub fn managed(&self) -> impl Iterator<Item = Property> + '_ {
        Property::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
    }
}

/// One declared repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct DesiredRepo {
    /// Repository id, passed as `--repo-id`
    pub name: String,
    #[serde(default)]
    pub ensure: Ensure,
    #[serde(flatten)]
    pub properties: RepoProperties,
    /// Keys that name no known property, kept so validation can reject them
    #[serde(flatten)]
    #[schemars(skip)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl DesiredRepo {
    #[must_use]
    pub fn present(name: impl Into<String>, properties: RepoProperties) -> Self {
        Self {
            name: name.into(),
            ensure: Ensure::Present,
            properties,
            unknown: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ensure: Ensure::Absent,
            properties: RepoProperties::default(),
            unknown: BTreeMap::new(),
        }
    }
}

/// The desired-state document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct DesiredStateFile {
    #[serde(default)]
    pub repos: Vec<DesiredRepo>,
}

impl DesiredStateFile {
    /// Parse a YAML document (JSON is accepted as a YAML subset)
    ///
    /// # Errors
    /// Returns an error if the document does not match the schema.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
