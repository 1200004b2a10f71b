//! Whole-document checks

use super::{validate_repo_id, ValidationError};
use crate::resource::DesiredRepo;
use std::collections::HashSet;

/// Validate every declared repository
///
/// Stops at the first problem; nothing has been fetched or changed yet.
pub fn validate_desired_state(repos: &[DesiredRepo]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for repo in repos {
        validate_repo_id(&repo.name)?;
        if !seen.insert(repo.name.as_str()) {
            return Err(ValidationError::DuplicateRepo(repo.name.clone()));
        }

        // A misspelled key would otherwise read as "not managed"
        if let Some(key) = repo.unknown.keys().next() {
            return Err(ValidationError::UnknownProperty {
                repo_id: repo.name.clone(),
                key: key.clone(),
            });
        }

        let properties = &repo.properties;
        if let Some(port) = properties.proxy_port {
            if !(1..=65535).contains(&port) {
                return Err(ValidationError::InvalidProxyPort {
                    repo_id: repo.name.clone(),
                    port,
                });
            }
        }
        // Notes are sent as key=value, so the first '=' ends the key
        if let Some(note) = &properties.note {
            if let Some(key) = note.keys().find(|k| k.is_empty() || k.contains('=')) {
                return Err(ValidationError::InvalidNoteKey {
                    repo_id: repo.name.clone(),
                    key: key.clone(),
                });
            }
        }
        // The skip list is sent comma-joined
        if let Some(skip) = &properties.skip {
            if let Some(entry) = skip.iter().find(|e| e.is_empty() || e.contains(',')) {
                return Err(ValidationError::InvalidSkipEntry {
                    repo_id: repo.name.clone(),
                    entry: entry.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::RepoProperties;

    fn repo(name: &str, properties: RepoProperties) -> DesiredRepo {
        DesiredRepo::present(name, properties)
    }

    #[test]
    fn test_valid_document() {
        let repos = vec![
            repo("epel7", RepoProperties::default()),
            DesiredRepo::absent("old-mirror"),
        ];
        assert!(validate_desired_state(&repos).is_ok());
    }

    #[test]
    fn test_empty_document_is_valid() {
        assert!(validate_desired_state(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let repos = vec![
            repo("epel7", RepoProperties::default()),
            DesiredRepo::absent("epel7"),
        ];
        assert_eq!(
            validate_desired_state(&repos),
            Err(ValidationError::DuplicateRepo("epel7".to_string()))
        );
    }

    #[test]
    fn test_proxy_port_range() {
        for port in [0, 65536] {
            let repos = vec![repo(
                "epel7",
                RepoProperties {
                    proxy_port: Some(port),
                    ..RepoProperties::default()
                },
            )];
            assert!(matches!(
                validate_desired_state(&repos),
                Err(ValidationError::InvalidProxyPort { port: p, .. }) if p == port
            ));
        }
        let ok = vec![repo(
            "epel7",
            RepoProperties {
                proxy_port: Some(65535),
                ..RepoProperties::default()
            },
        )];
        assert!(validate_desired_state(&ok).is_ok());
    }

    #[test]
    fn test_note_key_with_equals_rejected() {
        let repos = vec![repo(
            "epel7",
            RepoProperties {
                note: Some([("a=b".to_string(), "c".to_string())].into_iter().collect()),
                ..RepoProperties::default()
            },
        )];
        assert!(matches!(
            validate_desired_state(&repos),
            Err(ValidationError::InvalidNoteKey { .. })
        ));
    }

    #[test]
    fn test_skip_entry_with_comma_rejected() {
        let repos = vec![repo(
            "epel7",
            RepoProperties {
                skip: Some(vec!["rpm,drpm".to_string()]),
                ..RepoProperties::default()
            },
        )];
        assert!(matches!(
            validate_desired_state(&repos),
            Err(ValidationError::InvalidSkipEntry { .. })
        ));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut misspelled = repo("epel7", RepoProperties::default());
        misspelled
            .unknown
            .insert("gpgkey".to_string(), serde_yaml::Value::from("/etc/pki/key"));
        assert_eq!(
            validate_desired_state(&[misspelled]),
            Err(ValidationError::UnknownProperty {
                repo_id: "epel7".to_string(),
                key: "gpgkey".to_string(),
            })
        );
    }
}
