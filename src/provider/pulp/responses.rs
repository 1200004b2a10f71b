//! Pulp v2 REST response structures
//!
//! Only the fields the reconciler reads are modelled; plugin configuration
//! stays an untyped JSON object because its keys depend on the plugin.
//!
//! API Reference: https://docs.pulpproject.org/en/2.19/dev-guide/integration/rest-api/repo/retrieval.html

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A repository as returned by `GET /pulp/api/v2/repositories/?details=true`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawRepo {
    /// Repository id
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form notes, including Pulp's own `_repo-type` marker
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub importers: Vec<RawPlugin>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distributors: Vec<RawPlugin>,
}

/// An importer or distributor attached to a repository
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawPlugin {
    /// Plugin instance id (`yum_importer`, `yum_distributor`, `export_distributor`, ...)
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Map<String, Value>,
}

impl RawRepo {
    /// Note value as text; non-string notes are rendered as JSON
    #[must_use]
    pub fn note(&self, key: &str) -> Option<String> {
        self.notes.get(key).and_then(value_to_text)
    }

    #[must_use]
    pub fn importer(&self, id: &str) -> Option<&RawPlugin> {
        self.importers.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn distributor(&self, id: &str) -> Option<&RawPlugin> {
        self.distributors.iter().find(|p| p.id == id)
    }
}

/// Text form of a scalar JSON value, `None` for null
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
