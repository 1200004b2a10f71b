//! Common test utilities
//!
//! `FakePulp` is an in-memory Pulp server implementing both collaborator
//! traits. Commands are applied to raw records the way pulp-admin stores
//! them, so the reconciler sees real normalization on the way back.

#![allow(dead_code)]

use async_trait::async_trait;
use pulp_repo_controller::constants::{
    REPO_TYPE_NOTE_KEY, RPM_REPO_TYPE, YUM_DISTRIBUTOR_ID, YUM_IMPORTER_ID,
};
use pulp_repo_controller::provider::{
    CommandExecutor, ExecutionError, InventoryFetchError, InventoryLister, RawPlugin, RawRepo, Verb,
};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

/// One recorded executor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub verb: Verb,
    pub repo_id: String,
    pub args: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct FakePulp {
    repos: Mutex<BTreeMap<String, RawRepo>>,
    calls: Mutex<Vec<Call>>,
    list_calls: Mutex<usize>,
    fail_listing: Mutex<Option<String>>,
    fail_command: Mutex<Option<(String, String)>>,
}

impl FakePulp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record
    pub fn with_repo(self, repo: RawRepo) -> Self {
        self.repos
            .lock()
            .unwrap()
            .insert(repo.id.clone(), repo);
        self
    }

    /// Make every listing fail
    pub fn failing_listing(self, message: &str) -> Self {
        *self.fail_listing.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Make commands for `repo_id` exit non-zero with `message`
    pub fn failing_command(self, repo_id: &str, message: &str) -> Self {
        *self.fail_command.lock().unwrap() = Some((repo_id.to_string(), message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn raw(&self, repo_id: &str) -> Option<RawRepo> {
        self.repos.lock().unwrap().get(repo_id).cloned()
    }
}

#[async_trait]
impl CommandExecutor for FakePulp {
    async fn invoke(
        &self,
        verb: Verb,
        repo_id: &str,
        args: &[(String, String)],
    ) -> Result<(), ExecutionError> {
        self.calls.lock().unwrap().push(Call {
            verb,
            repo_id: repo_id.to_string(),
            args: args.to_vec(),
        });

        if let Some((failing_id, message)) = self.fail_command.lock().unwrap().clone() {
            if failing_id == repo_id {
                return Err(failed(&message));
            }
        }

        let mut repos = self.repos.lock().unwrap();
        match verb {
            Verb::Create => {
                if repos.contains_key(repo_id) {
                    return Err(failed(&format!(
                        "A resource with the ID \"{repo_id}\" already exists."
                    )));
                }
                let mut repo = RawRepo {
                    id: repo_id.to_string(),
                    ..RawRepo::default()
                };
                repo.notes
                    .insert(REPO_TYPE_NOTE_KEY.to_string(), json!(RPM_REPO_TYPE));
                repo.importers.push(plugin(YUM_IMPORTER_ID));
                repo.distributors.push(plugin(YUM_DISTRIBUTOR_ID));
                apply_args(&mut repo, args);
                repos.insert(repo_id.to_string(), repo);
            }
            Verb::Update => {
                let Some(repo) = repos.get_mut(repo_id) else {
                    return Err(failed(&format!(
                        "The following resource(s) could not be found: {repo_id}"
                    )));
                };
                apply_args(repo, args);
            }
            Verb::Delete => {
                if repos.remove(repo_id).is_none() {
                    return Err(failed(&format!(
                        "The following resource(s) could not be found: {repo_id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryLister for FakePulp {
    async fn list_all(&self) -> Result<Vec<RawRepo>, InventoryFetchError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(message) = self.fail_listing.lock().unwrap().clone() {
            return Err(InventoryFetchError::Unavailable(message));
        }
        Ok(self.repos.lock().unwrap().values().cloned().collect())
    }

    async fn get_one(&self, repo_id: &str) -> Result<Option<RawRepo>, InventoryFetchError> {
        Ok(self.repos.lock().unwrap().get(repo_id).cloned())
    }
}

fn failed(message: &str) -> ExecutionError {
    ExecutionError::Failed {
        status: Some(1),
        message: message.to_string(),
    }
}

fn plugin(id: &str) -> RawPlugin {
    RawPlugin {
        id: id.to_string(),
        config: Map::new(),
    }
}

/// Store flags the way Pulp keeps them in repository, importer and
/// distributor config. Secret-file flags upload the file content.
fn apply_args(repo: &mut RawRepo, args: &[(String, String)]) {
    let mut notes_seen = false;
    for (flag, value) in args {
        let (target, key, stored) = match flag.as_str() {
            "--display-name" => {
                repo.display_name = Some(value.clone());
                continue;
            }
            "--description" => {
                repo.description = Some(value.clone());
                continue;
            }
            "--note" => {
                if !notes_seen {
                    repo.notes.retain(|k, _| k == REPO_TYPE_NOTE_KEY);
                    notes_seen = true;
                }
                if let Some((k, v)) = value.split_once('=') {
                    repo.notes.insert(k.to_string(), json!(v));
                }
                continue;
            }
            "--feed" => (YUM_IMPORTER_ID, "feed", json!(value)),
            "--validate" => (YUM_IMPORTER_ID, "validate", boolean(value)),
            "--skip" => (
                YUM_IMPORTER_ID,
                "type_skip_list",
                Value::Array(
                    value
                        .split(',')
                        .filter(|s| !s.is_empty())
                        .map(|s| json!(s))
                        .collect(),
                ),
            ),
            "--feed-ca-cert" => (YUM_IMPORTER_ID, "ssl_ca_cert", upload(value)),
            "--verify-feed-ssl" => (YUM_IMPORTER_ID, "ssl_validation", boolean(value)),
            "--feed-cert" => (YUM_IMPORTER_ID, "ssl_client_cert", upload(value)),
            "--feed-key" => (YUM_IMPORTER_ID, "ssl_client_key", upload(value)),
            "--proxy-host" => (YUM_IMPORTER_ID, "proxy_host", json!(value)),
            "--proxy-port" => (YUM_IMPORTER_ID, "proxy_port", number(value)),
            "--proxy-user" => (YUM_IMPORTER_ID, "proxy_username", json!(value)),
            "--proxy-pass" => (YUM_IMPORTER_ID, "proxy_password", json!(value)),
            "--max-downloads" => (YUM_IMPORTER_ID, "max_downloads", number(value)),
            "--max-speed" => (YUM_IMPORTER_ID, "max_speed", number(value)),
            "--remove-missing" => (YUM_IMPORTER_ID, "remove_missing", boolean(value)),
            "--retain-old-count" => (YUM_IMPORTER_ID, "retain_old_count", number(value)),
            "--relative-url" => (YUM_DISTRIBUTOR_ID, "relative_url", json!(value)),
            "--serve-http" => (YUM_DISTRIBUTOR_ID, "http", boolean(value)),
            "--serve-https" => (YUM_DISTRIBUTOR_ID, "https", boolean(value)),
            "--checksum-type" => (YUM_DISTRIBUTOR_ID, "checksum_type", json!(value)),
            "--gpg-key" => (YUM_DISTRIBUTOR_ID, "gpgkey", upload(value)),
            "--generate-sqlite" => (YUM_DISTRIBUTOR_ID, "generate_sqlite", boolean(value)),
            "--host-ca" => (YUM_DISTRIBUTOR_ID, "https_ca", upload(value)),
            "--auth-ca" => (YUM_DISTRIBUTOR_ID, "auth_ca", upload(value)),
            "--auth-cert" => (YUM_DISTRIBUTOR_ID, "auth_cert", upload(value)),
            other => panic!("unexpected flag {other}"),
        };
        let plugins = if target == YUM_IMPORTER_ID {
            &mut repo.importers
        } else {
            &mut repo.distributors
        };
        if let Some(p) = plugins.iter_mut().find(|p| p.id == target) {
            p.config.insert(key.to_string(), stored);
        }
    }
}

fn boolean(value: &str) -> Value {
    json!(value == "true")
}

fn number(value: &str) -> Value {
    json!(value.parse::<u64>().unwrap())
}

fn upload(path: &str) -> Value {
    json!(std::fs::read_to_string(path).unwrap_or_else(|_| panic!("cannot read {path}")))
}

/// A raw RPM repository as Pulp reports it
pub fn rpm_repo(id: &str, importer: Value, distributor: Value) -> RawRepo {
    serde_json::from_value(json!({
        "id": id,
        "notes": { REPO_TYPE_NOTE_KEY: RPM_REPO_TYPE },
        "importers": [{ "id": YUM_IMPORTER_ID, "config": importer }],
        "distributors": [{ "id": YUM_DISTRIBUTOR_ID, "config": distributor }],
    }))
    .unwrap()
}

/// A temporary file holding `content`
pub fn secret_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
