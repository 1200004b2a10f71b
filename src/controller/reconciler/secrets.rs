//! # Secret Property Comparison
//!
//! Secret-file properties are declared as local paths but stored on the
//! server as file content. The comparator proves the two are equal without
//! ever reporting the remote content back.

use crate::constants::FINGERPRINT_HEX_LEN;
use crate::resource::{Property, RepoProperties};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Result of comparing a local secret file with the stored content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretComparison {
    /// No path configured or nothing stored remotely
    NotFound,
    /// Local file content equals the stored content
    Unchanged,
    /// Local file differs or cannot be read
    Changed,
}

/// A local secret file could not be read
#[derive(Debug, Error)]
#[error("failed to read secret file {}: {source}", path.display())]
pub struct SecretReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

fn read_secret(path: &Path) -> Result<Zeroizing<String>, SecretReadError> {
    std::fs::read_to_string(path)
        .map(Zeroizing::new)
        .map_err(|source| SecretReadError {
            path: path.to_path_buf(),
            source,
        })
}

/// Compare the file at `desired_path` with `last_known` content
#[must_use]
pub fn compare(desired_path: Option<&str>, last_known: Option<&str>) -> SecretComparison {
    let (Some(path), Some(stored)) = (desired_path, last_known) else {
        return SecretComparison::NotFound;
    };
    match read_secret(Path::new(path)) {
        Ok(content) if content.as_str() == stored => SecretComparison::Unchanged,
        Ok(content) => {
            debug!(
                "Secret file {} ({}) differs from stored content ({})",
                path,
                fingerprint(&content),
                fingerprint(stored)
            );
            SecretComparison::Changed
        }
        Err(e) => {
            // Unreadable is a legitimate "does not match" state
            debug!("{}", e);
            SecretComparison::Changed
        }
    }
}

/// The desired path when its content matches `last_known`, otherwise `None`
#[must_use]
pub fn resolve(desired_path: Option<&str>, last_known: Option<&str>) -> Option<String> {
    match compare(desired_path, last_known) {
        SecretComparison::Unchanged => desired_path.map(str::to_string),
        SecretComparison::NotFound | SecretComparison::Changed => None,
    }
}

/// Canonical properties as seen from the desired side
///
/// Secret-file slots are replaced by the comparator result so they can be
/// compared with the desired paths by plain equality.
#[must_use]
pub fn comparable_view(desired: &RepoProperties, canonical: &RepoProperties) -> RepoProperties {
    let mut view = canonical.clone();
    for property in Property::SECRET_FILES {
        let resolved = resolve(desired.secret(property), canonical.secret(property));
        if let Some(slot) = view.secret_mut(property) {
            *slot = resolved;
        }
    }
    view
}

/// Short, non-reversible identifier for stored secret content
#[must_use]
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hex = String::with_capacity(FINGERPRINT_HEX_LEN);
    for byte in digest.iter().take(FINGERPRINT_HEX_LEN.div_ceil(2)) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex.truncate(FINGERPRINT_HEX_LEN);
    format!("sha256:{hex}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn secret_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_matching_content_returns_path() {
        let file = secret_file("-----BEGIN PGP PUBLIC KEY BLOCK-----\nabc\n");
        let path = file.path().to_str().unwrap();
        assert_eq!(
            resolve(Some(path), Some("-----BEGIN PGP PUBLIC KEY BLOCK-----\nabc\n")),
            Some(path.to_string())
        );
    }

    #[test]
    fn test_different_content_returns_none() {
        let file = secret_file("new key");
        let path = file.path().to_str().unwrap();
        assert_eq!(compare(Some(path), Some("old key")), SecretComparison::Changed);
        assert_eq!(resolve(Some(path), Some("old key")), None);
    }

    #[test]
    fn test_unreadable_file_is_no_match() {
        assert_eq!(
            compare(Some("/nonexistent/gpg.key"), Some("anything")),
            SecretComparison::Changed
        );
        assert_eq!(resolve(Some("/nonexistent/gpg.key"), Some("anything")), None);
    }

    #[test]
    fn test_nothing_to_compare() {
        assert_eq!(compare(None, Some("stored")), SecretComparison::NotFound);
        assert_eq!(compare(Some("/tmp/x"), None), SecretComparison::NotFound);
    }

    #[test]
    fn test_comparable_view_only_touches_secret_files() {
        let file = secret_file("CA");
        let path = file.path().to_str().unwrap().to_string();
        let desired = RepoProperties {
            host_ca: Some(path.clone()),
            auth_ca: Some("/nonexistent/ca.pem".to_string()),
            ..RepoProperties::default()
        };
        let canonical = RepoProperties {
            host_ca: Some("CA".to_string()),
            auth_ca: Some("other".to_string()),
            feed_key: Some("KEY".to_string()),
            relative_url: Some("epel".to_string()),
            ..RepoProperties::default()
        };
        let view = comparable_view(&desired, &canonical);
        assert_eq!(view.host_ca, Some(path));
        assert_eq!(view.auth_ca, None);
        // Not declared, so never exposed
        assert_eq!(view.feed_key, None);
        assert_eq!(view.relative_url.as_deref(), Some("epel"));
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("secret");
        assert!(fp.starts_with("sha256:"));
        assert_eq!(fp.len(), "sha256:".len() + FINGERPRINT_HEX_LEN);
        assert_eq!(fp, fingerprint("secret"));
        assert_ne!(fp, fingerprint("secret2"));
    }
}
