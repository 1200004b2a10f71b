//! # Parameter Marshalling
//!
//! Converts property values into the ordered (flag, value) pairs handed to
//! pulp-admin.
//!
//! Rules, one per value shape:
//! - absent values (and unset tri-state booleans) produce no pair
//! - text passes through unchanged, integers are rendered in decimal
//! - booleans are rendered `true` / `false`
//! - lists are joined with `,` into a single value
//! - maps produce one `key=value` pair per entry, all under the same flag
//!
//! Marshalling is pure: the output depends only on the input and its order.

use crate::constants::REDACTED;
use crate::resource::{Property, PropertyValue, RepoProperties};

/// Marshal `(flag, value)` entries in the order given
pub fn marshal<'a, I>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, Option<PropertyValue>)>,
{
    let mut pairs = Vec::new();
    for (flag, value) in params {
        let Some(value) = value else { continue };
        match value {
            PropertyValue::Text(text) => pairs.push((flag.to_string(), text)),
            PropertyValue::Integer(n) => pairs.push((flag.to_string(), n.to_string())),
            PropertyValue::Bool(b) => {
                if let Some(text) = b.as_str() {
                    pairs.push((flag.to_string(), text.to_string()));
                }
            }
            PropertyValue::List(items) => pairs.push((flag.to_string(), items.join(","))),
            PropertyValue::Map(entries) => {
                for (key, val) in entries {
                    pairs.push((flag.to_string(), format!("{key}={val}")));
                }
            }
        }
    }
    pairs
}

/// Every property of a desired record keyed by flag, in command-line order
pub fn desired_params(
    properties: &RepoProperties,
) -> impl Iterator<Item = (&'static str, Option<PropertyValue>)> + '_ {
    Property::ALL
        .into_iter()
        .map(move |p| (p.flag(), properties.get(p)))
}

/// Marshal a desired record into pulp-admin arguments
pub fn marshal_properties(properties: &RepoProperties) -> Vec<(String, String)> {
    marshal(desired_params(properties))
}

/// Mask the values of sensitive flags
pub fn redact(args: &[(String, String)]) -> Vec<(String, String)> {
    args.iter()
        .map(|(flag, value)| {
            let sensitive = Property::from_flag(flag).is_some_and(Property::is_sensitive);
            let shown = if sensitive { REDACTED.to_string() } else { value.clone() };
            (flag.clone(), shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::TriState;
    use std::collections::BTreeMap;

    fn pair(flag: &str, value: &str) -> (String, String) {
        (flag.to_string(), value.to_string())
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let out = marshal([
            ("--display-name", None),
            ("--feed", Some(PropertyValue::from(""))),
            ("--validate", Some(PropertyValue::Bool(TriState::Unset))),
        ]);
        assert_eq!(out, vec![pair("--feed", "")]);
    }

    #[test]
    fn test_list_is_joined_once() {
        let out = marshal([(
            "--skip",
            Some(PropertyValue::List(vec!["erratum".into(), "drpm".into()])),
        )]);
        assert_eq!(out, vec![pair("--skip", "erratum,drpm")]);
    }

    #[test]
    fn test_map_expands_to_one_pair_per_entry() {
        let notes: BTreeMap<String, String> = [
            ("owner".to_string(), "infra".to_string()),
            ("tier".to_string(), "gold".to_string()),
            ("url".to_string(), "http://x/?a=b".to_string()),
        ]
        .into_iter()
        .collect();
        let out = marshal([("--note", Some(PropertyValue::Map(notes)))]);
        assert_eq!(
            out,
            vec![
                pair("--note", "owner=infra"),
                pair("--note", "tier=gold"),
                pair("--note", "url=http://x/?a=b"),
            ]
        );
    }

    #[test]
    fn test_empty_map_emits_nothing() {
        let out = marshal([("--note", Some(PropertyValue::Map(BTreeMap::new())))]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_scalars() {
        let out = marshal([
            ("--serve-http", Some(PropertyValue::Bool(TriState::True))),
            ("--serve-https", Some(PropertyValue::Bool(TriState::False))),
            ("--max-downloads", Some(PropertyValue::Integer(4))),
            ("--relative-url", Some(PropertyValue::from("epel/7"))),
        ]);
        assert_eq!(
            out,
            vec![
                pair("--serve-http", "true"),
                pair("--serve-https", "false"),
                pair("--max-downloads", "4"),
                pair("--relative-url", "epel/7"),
            ]
        );
    }

    #[test]
    fn test_order_is_caller_order_and_deterministic() {
        let props = RepoProperties {
            relative_url: Some("epel".into()),
            display_name: Some("EPEL".into()),
            validate: TriState::True,
            note: Some([("a".to_string(), "1".to_string())].into_iter().collect()),
            ..RepoProperties::default()
        };
        let first = marshal_properties(&props);
        let second = marshal_properties(&props);
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                pair("--display-name", "EPEL"),
                pair("--note", "a=1"),
                pair("--validate", "true"),
                pair("--relative-url", "epel"),
            ]
        );
    }

    #[test]
    fn test_redact_masks_proxy_password_only() {
        let args = vec![pair("--proxy-user", "bob"), pair("--proxy-pass", "hunter2")];
        assert_eq!(
            redact(&args),
            vec![pair("--proxy-user", "bob"), pair("--proxy-pass", REDACTED)]
        );
    }
}
