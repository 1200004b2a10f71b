//! Repository id format

use super::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static REPO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.][A-Za-z0-9_.-]*$")
        .expect("Failed to compile repository id regex - this should never happen")
});

/// Validate a repository id
/// Format: letters, digits, underscores, dots and hyphens; at least one character
///
/// A leading hyphen would be read as a pulp-admin option, and `.` or `..`
/// would change the REST path of the repository.
pub fn validate_repo_id(id: &str) -> Result<(), ValidationError> {
    if REPO_ID_REGEX.is_match(id) && id != "." && id != ".." {
        Ok(())
    } else {
        Err(ValidationError::InvalidRepoId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for id in ["epel7", "centos-7.9_base", "A", "rhel.8-appstream", ".hidden", "_x-"] {
            assert!(validate_repo_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn test_invalid_ids() {
        for id in [
            "",
            "has space",
            "slash/id",
            "semi;colon",
            "ünïcode",
            "epel7\n",
            ".",
            "..",
            "-epel7",
            "--repo-id",
        ] {
            assert_eq!(
                validate_repo_id(id),
                Err(ValidationError::InvalidRepoId(id.to_string())),
                "{id:?} should be rejected"
            );
        }
    }
}
