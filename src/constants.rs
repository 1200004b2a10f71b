//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! Values that describe the Pulp data model (type marker, plugin ids) are fixed
//! by Pulp itself. Operational defaults can be overridden via configuration or
//! environment variables.

/// Notes key Pulp uses to record which plugin family owns a repository
pub const REPO_TYPE_NOTE_KEY: &str = "_repo-type";

/// Value of [`REPO_TYPE_NOTE_KEY`] for RPM repositories
pub const RPM_REPO_TYPE: &str = "rpm-repo";

/// Distributor id whose config carries the publishing properties
pub const YUM_DISTRIBUTOR_ID: &str = "yum_distributor";

/// Importer id whose config carries the sync properties
pub const YUM_IMPORTER_ID: &str = "yum_importer";

/// Default location of the admin client
pub const DEFAULT_PULP_ADMIN_PATH: &str = "/usr/bin/pulp-admin";

/// Binary name searched on PATH when the configured path does not exist
pub const PULP_ADMIN_BINARY: &str = "pulp-admin";

/// Default Pulp server base URL (REST API used for observation)
pub const DEFAULT_PULP_API_URL: &str = "https://localhost";

/// REST path of the repository collection
pub const REPOSITORIES_API_PATH: &str = "/pulp/api/v2/repositories/";

/// Default HTTP timeout for inventory requests (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Placeholder printed instead of redacted argument values
pub const REDACTED: &str = "********";

/// Number of hex characters shown in secret fingerprints
pub const FINGERPRINT_HEX_LEN: usize = 12;
