//! Configuration namespace and environment variable collection.

use std::collections::HashMap;

use depot_common::{Error, Result};

use crate::backend::Arguments;

/// Prefix applied to every parameter name before lookup.
pub const DEFAULT_PREFIX: &str = "STORAGES_";

/// A flat key-value configuration source.
pub trait Environment: Send + Sync {
    /// Look up a key. `None` means the key is not defined.
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Key a parameter is looked up under: `<PREFIX><NAME_UPPERCASED>`.
pub fn environment_variable_name(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_uppercase())
}

/// Resolve every name from `env`.
///
/// # Errors
/// - `Error::MissingConfiguration` with the transformed key of the first
///   name that is not defined. Nothing is returned for the other names.
pub fn collect<I, S>(names: I, prefix: &str, env: &dyn Environment) -> Result<Arguments>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Arguments::new();
    for name in names {
        let name = name.as_ref();
        let key = environment_variable_name(prefix, name);
        let value = env.get(&key).ok_or(Error::MissingConfiguration(key))?;
        values.insert(name, value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mock_environment() -> HashMap<String, String> {
        [
            ("STORAGES_PARAM_A", "a"),
            ("STORAGES_PARAM_B", "b"),
            ("STORAGES_PARAM_C", "c"),
            ("NOT_STORAGES_RELATED_PARAM", "any_value"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_collecting_a_and_b() {
        let values = collect(["param_a", "param_b"], DEFAULT_PREFIX, &mock_environment()).unwrap();
        assert_eq!(values.get("param_a"), Some("a"));
        assert_eq!(values.get("param_b"), Some("b"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_collecting_b_and_c() {
        let values = collect(["param_b", "param_c"], DEFAULT_PREFIX, &mock_environment()).unwrap();
        assert_eq!(values.get("param_b"), Some("b"));
        assert_eq!(values.get("param_c"), Some("c"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_collecting_prefixed() {
        let values = collect(["param"], "NOT_STORAGES_RELATED_", &mock_environment()).unwrap();
        assert_eq!(values.get("param"), Some("any_value"));
    }

    #[test]
    fn test_missing_environment_variable() {
        let err = collect(["param_a", "missing"], DEFAULT_PREFIX, &mock_environment()).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(key) if key == "STORAGES_MISSING"));
    }

    #[test]
    fn test_empty_names_yield_empty_arguments() {
        let values = collect(Vec::<String>::new(), DEFAULT_PREFIX, &mock_environment()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_empty_value_is_passed_through() {
        let env: HashMap<String, String> =
            [("STORAGES_PATH".to_string(), String::new())].into_iter().collect();
        let values = collect(["path"], DEFAULT_PREFIX, &env).unwrap();
        assert_eq!(values.get("path"), Some(""));
    }

    #[test]
    fn test_process_environment_reports_undefined_key() {
        assert_eq!(
            ProcessEnvironment.get("DEPOT_TEST_SURELY_UNDEFINED_VARIABLE"),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_key_is_prefixed_uppercase(name in "[a-z][a-z0-9_]{0,16}") {
            let key = environment_variable_name(DEFAULT_PREFIX, &name);
            prop_assert!(key.starts_with(DEFAULT_PREFIX));
            prop_assert_eq!(&key[DEFAULT_PREFIX.len()..], name.to_uppercase());
        }
    }
}
