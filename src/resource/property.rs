//! # Properties
//!
//! The fixed property table of an RPM repository and the closed set of value
//! shapes a property can take.
//!
//! Every property has a canonical field name (`display_name`) and the
//! pulp-admin flag it is written with (`--display-name`). The declaration order
//! of [`Property::ALL`] is the argument order used on the command line.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Shape of the values a property accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Text,
    Integer,
    Bool,
    List,
    Map,
    /// Path of a local file whose content is uploaded (certificates, keys)
    SecretFile,
}

/// A managed repository property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    DisplayName,
    Description,
    Note,
    Feed,
    Validate,
    Skip,
    FeedCaCert,
    VerifyFeedSsl,
    FeedCert,
    FeedKey,
    ProxyHost,
    ProxyPort,
    ProxyUser,
    ProxyPass,
    MaxDownloads,
    MaxSpeed,
    RemoveMissing,
    RetainOldCount,
    RelativeUrl,
    ServeHttp,
    ServeHttps,
    ChecksumType,
    GpgKey,
    GenerateSqlite,
    HostCa,
    AuthCa,
    AuthCert,
}

impl Property {
    /// All properties in command-line order
    pub const ALL: [Property; 27] = [
        Property::DisplayName,
        Property::Description,
        Property::Note,
        Property::Feed,
        Property::Validate,
        Property::Skip,
        Property::FeedCaCert,
        Property::VerifyFeedSsl,
        Property::FeedCert,
        Property::FeedKey,
        Property::ProxyHost,
        Property::ProxyPort,
        Property::ProxyUser,
        Property::ProxyPass,
        Property::MaxDownloads,
        Property::MaxSpeed,
        Property::RemoveMissing,
        Property::RetainOldCount,
        Property::RelativeUrl,
        Property::ServeHttp,
        Property::ServeHttps,
        Property::ChecksumType,
        Property::GpgKey,
        Property::GenerateSqlite,
        Property::HostCa,
        Property::AuthCa,
        Property::AuthCert,
    ];

    /// Properties whose value is a local file path and whose remote value is the file content
    pub const SECRET_FILES: [Property; 7] = [
        Property::FeedCaCert,
        Property::FeedCert,
        Property::FeedKey,
        Property::GpgKey,
        Property::HostCa,
        Property::AuthCa,
        Property::AuthCert,
    ];

    /// Canonical field name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Property::DisplayName => "display_name",
            Property::Description => "description",
            Property::Note => "note",
            Property::Feed => "feed",
            Property::Validate => "validate",
            Property::Skip => "skip",
            Property::FeedCaCert => "feed_ca_cert",
            Property::VerifyFeedSsl => "verify_feed_ssl",
            Property::FeedCert => "feed_cert",
            Property::FeedKey => "feed_key",
            Property::ProxyHost => "proxy_host",
            Property::ProxyPort => "proxy_port",
            Property::ProxyUser => "proxy_user",
            Property::ProxyPass => "proxy_pass",
            Property::MaxDownloads => "max_downloads",
            Property::MaxSpeed => "max_speed",
            Property::RemoveMissing => "remove_missing",
            Property::RetainOldCount => "retain_old_count",
            Property::RelativeUrl => "relative_url",
            Property::ServeHttp => "serve_http",
            Property::ServeHttps => "serve_https",
            Property::ChecksumType => "checksum_type",
            Property::GpgKey => "gpg_key",
            Property::GenerateSqlite => "generate_sqlite",
            Property::HostCa => "host_ca",
            Property::AuthCa => "auth_ca",
            Property::AuthCert => "auth_cert",
        }
    }

    /// pulp-admin flag
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Property::DisplayName => "--display-name",
            Property::Description => "--description",
            Property::Note => "--note",
            Property::Feed => "--feed",
            Property::Validate => "--validate",
            Property::Skip => "--skip",
            Property::FeedCaCert => "--feed-ca-cert",
            Property::VerifyFeedSsl => "--verify-feed-ssl",
            Property::FeedCert => "--feed-cert",
            Property::FeedKey => "--feed-key",
            Property::ProxyHost => "--proxy-host",
            Property::ProxyPort => "--proxy-port",
            Property::ProxyUser => "--proxy-user",
            Property::ProxyPass => "--proxy-pass",
            Property::MaxDownloads => "--max-downloads",
            Property::MaxSpeed => "--max-speed",
            Property::RemoveMissing => "--remove-missing",
            Property::RetainOldCount => "--retain-old-count",
            Property::RelativeUrl => "--relative-url",
            Property::ServeHttp => "--serve-http",
            Property::ServeHttps => "--serve-https",
            Property::ChecksumType => "--checksum-type",
            Property::GpgKey => "--gpg-key",
            Property::GenerateSqlite => "--generate-sqlite",
            Property::HostCa => "--host-ca",
            Property::AuthCa => "--auth-ca",
            Property::AuthCert => "--auth-cert",
        }
    }

    #[must_use]
    pub fn kind(self) -> PropertyKind {
        match self {
            Property::Note => PropertyKind::Map,
            Property::Skip => PropertyKind::List,
            Property::Validate
            | Property::VerifyFeedSsl
            | Property::RemoveMissing
            | Property::ServeHttp
            | Property::ServeHttps
            | Property::GenerateSqlite => PropertyKind::Bool,
            Property::ProxyPort
            | Property::MaxDownloads
            | Property::MaxSpeed
            | Property::RetainOldCount => PropertyKind::Integer,
            Property::FeedCaCert
            | Property::FeedCert
            | Property::FeedKey
            | Property::GpgKey
            | Property::HostCa
            | Property::AuthCa
            | Property::AuthCert => PropertyKind::SecretFile,
            Property::DisplayName
            | Property::Description
            | Property::Feed
            | Property::ProxyHost
            | Property::ProxyUser
            | Property::ProxyPass
            | Property::RelativeUrl
            | Property::ChecksumType => PropertyKind::Text,
        }
    }

    #[must_use]
    pub fn is_secret_file(self) -> bool {
        self.kind() == PropertyKind::SecretFile
    }

    /// Values that must never appear in logs or printed argument lists
    #[must_use]
    pub fn is_sensitive(self) -> bool {
        self == Property::ProxyPass
    }

    /// Look up a property by its flag
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Property> {
        Property::ALL.into_iter().find(|p| p.flag() == flag)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean with an explicit "not set" state
///
/// `Unset` means the property is not managed; it is never sent to pulp-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    True,
    False,
    #[default]
    Unset,
}

impl TriState {
    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == TriState::Unset
    }

    /// String form passed on the command line
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            TriState::True => Some("true"),
            TriState::False => Some("false"),
            TriState::Unset => None,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unset"))
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TriState::True => serializer.serialize_bool(true),
            TriState::False => serializer.serialize_bool(false),
            TriState::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(TriState::Unset),
            Some(Raw::Bool(b)) => Ok(b.into()),
            Some(Raw::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(TriState::True),
                "false" => Ok(TriState::False),
                "" | "unset" | "undef" => Ok(TriState::Unset),
                other => Err(serde::de::Error::custom(format!(
                    "invalid boolean '{other}', expected true, false or unset"
                ))),
            },
        }
    }
}

/// The value of one property
///
/// Maps are ordered by key so that marshalling is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Integer(u64),
    Bool(TriState),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<TriState> for PropertyValue {
    fn from(value: TriState) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

impl From<BTreeMap<String, String>> for PropertyValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        PropertyValue::Map(value)
    }
}

/// Deserializers for values that arrive either as numbers or numeric strings
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    pub fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(|_| {
                serde::de::Error::custom(format!("invalid integer '{s}'"))
            }),
        }
    }
}
