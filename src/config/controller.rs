//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PULP_ADMIN_PATH, DEFAULT_PULP_API_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables
/// (optionally seeded from a `.env` file) and then by command-line flags.
#[derive(Clone)]
pub struct ControllerConfig {
    /// Path of the pulp-admin binary
    /// Searched on PATH when the file does not exist
    pub pulp_admin_path: PathBuf,
    /// Base URL of the Pulp server REST API
    pub pulp_api_url: String,
    /// Pulp username, used for both pulp-admin and the REST API
    pub pulp_username: Option<String>,
    /// Pulp password
    pub pulp_password: Option<String>,
    /// Verify the Pulp server certificate on REST requests
    pub pulp_verify_ssl: bool,
    /// Timeout for REST requests (seconds)
    pub http_timeout_secs: u64,
    /// Global log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Write metrics in Prometheus text format to this path after each run
    pub metrics_textfile: Option<PathBuf>,
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("pulp_admin_path", &self.pulp_admin_path)
            .field("pulp_api_url", &self.pulp_api_url)
            .field("pulp_username", &self.pulp_username)
            .field("pulp_password", &self.pulp_password.as_ref().map(|_| "<redacted>"))
            .field("pulp_verify_ssl", &self.pulp_verify_ssl)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("metrics_textfile", &self.metrics_textfile)
            .finish()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pulp_admin_path: PathBuf::from(DEFAULT_PULP_ADMIN_PATH),
            pulp_api_url: DEFAULT_PULP_API_URL.to_string(),
            pulp_username: None,
            pulp_password: None,
            pulp_verify_ssl: true,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            metrics_textfile: None,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            pulp_admin_path: PathBuf::from(env_var_or_default_str(
                "PULP_ADMIN_PATH",
                DEFAULT_PULP_ADMIN_PATH,
            )),
            pulp_api_url: env_var_or_default_str("PULP_API_URL", DEFAULT_PULP_API_URL),
            pulp_username: env_var_opt("PULP_USERNAME"),
            pulp_password: env_var_opt("PULP_PASSWORD"),
            pulp_verify_ssl: env_var_or_default_bool("PULP_VERIFY_SSL", true),
            http_timeout_secs: env_var_or_default(
                "PULP_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            ),
            log_level: env_var_or_default_str("LOG_LEVEL", "info"),
            log_format: env_var_or_default_str("LOG_FORMAT", "text"),
            metrics_textfile: env_var_opt("METRICS_TEXTFILE").map(PathBuf::from),
        }
    }

    /// Get REST request timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read environment variable, treating empty values as unset
fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> bool {
    let v_lower = value.to_lowercase();
    v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
}
