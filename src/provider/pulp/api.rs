//! # Pulp REST Inventory
//!
//! Reads repository records from the Pulp v2 REST API.
//!
//! - `list_all`: `GET /pulp/api/v2/repositories/?details=true`
//! - `get_one`: `GET /pulp/api/v2/repositories/<id>/?details=true` (404 means absent)
//!
//! `details=true` makes Pulp embed the importer and distributor configuration
//! the canonical mapper needs, so one request per call is enough.

use super::super::{InventoryFetchError, InventoryLister};
use super::responses::RawRepo;
use crate::config::ControllerConfig;
use crate::constants::REPOSITORIES_API_PATH;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Inventory lister backed by the Pulp REST API
pub struct PulpApi {
    http_client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for PulpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulpApi")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl PulpApi {
    /// Create a REST client from configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        if !config.pulp_verify_ssl {
            warn!("TLS certificate verification is disabled for {}", config.pulp_api_url);
        }

        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .danger_accept_invalid_certs(!config.pulp_verify_ssl)
            .build()
            .context("Failed to create HTTP client")?;

        info!("Initializing Pulp REST client for {}", config.pulp_api_url);

        Ok(Self {
            http_client,
            base_url: config.pulp_api_url.trim_end_matches('/').to_string(),
            username: config.pulp_username.clone(),
            password: config.pulp_password.clone(),
        })
    }

    /// URL of the repository collection, or of one repository
    fn repositories_url(&self, repo_id: Option<&str>) -> String {
        match repo_id {
            Some(id) => format!("{}{REPOSITORIES_API_PATH}{id}/?details=true", self.base_url),
            None => format!("{}{REPOSITORIES_API_PATH}?details=true", self.base_url),
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http_client.get(url);
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    /// GET and decode; `Ok(None)` on 404
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, InventoryFetchError> {
        debug!("GET {}", url);
        let response = self
            .request(url)
            .send()
            .await
            .map_err(|source| InventoryFetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|source| InventoryFetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(InventoryFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| InventoryFetchError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl InventoryLister for PulpApi {
    async fn list_all(&self) -> Result<Vec<RawRepo>, InventoryFetchError> {
        let url = self.repositories_url(None);
        // The collection endpoint never 404s on a healthy server; treat it as a failure
        self.fetch(&url).await?.ok_or_else(|| InventoryFetchError::Status {
            url,
            status: StatusCode::NOT_FOUND.as_u16(),
            body: String::new(),
        })
    }

    async fn get_one(&self, repo_id: &str) -> Result<Option<RawRepo>, InventoryFetchError> {
        self.fetch(&self.repositories_url(Some(repo_id))).await
    }
}
