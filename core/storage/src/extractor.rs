//! Constructor argument extraction.

use crate::backend::{BackendDescriptor, ParameterKind};

/// Receiver names that are never configuration parameters.
pub const DEFAULT_IGNORED_ARGUMENTS: &[&str] = &["self", "cls"];

/// Yield the names of the parameters a backend needs from configuration.
///
/// Names come out lazily in declaration order. Variadic parameters and any
/// name listed in `ignored` are skipped. An empty result is valid.
pub fn extract<'a>(
    descriptor: &BackendDescriptor,
    ignored: &'a [&'a str],
) -> impl Iterator<Item = &'static str> + 'a {
    descriptor
        .parameters()
        .iter()
        .filter(move |parameter| {
            parameter.kind == ParameterKind::Named && !ignored.contains(&parameter.name)
        })
        .map(|parameter| parameter.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Arguments, Backend, Parameter};
    use crate::backends::{FileSystemStorage, MemoryStorage};
    use crate::storage::Storage;
    use depot_common::{Error, Result};
    use std::sync::Arc;

    const TEST_PARAMETERS: &[Parameter] = &[
        Parameter::named("self"),
        Parameter::named("a"),
        Parameter::named("b"),
        Parameter::named("c"),
        Parameter::variadic("rest"),
        Parameter::named("d"),
        Parameter::named("e"),
    ];

    fn unconstructible(_arguments: Arguments) -> Result<Arc<dyn Storage>> {
        Err(Error::Backend("test backend".to_string()))
    }

    fn test_descriptor() -> BackendDescriptor {
        BackendDescriptor::new("tests", "TestStorage", TEST_PARAMETERS, unconstructible)
    }

    #[test]
    fn test_extraction() {
        let arguments: Vec<&str> = extract(&test_descriptor(), DEFAULT_IGNORED_ARGUMENTS).collect();
        assert_eq!(arguments, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_extraction_with_custom_ignored_arguments() {
        let arguments: Vec<&str> = extract(&test_descriptor(), &["a", "b"]).collect();
        assert_eq!(arguments, ["self", "c", "d", "e"]);
    }

    #[test]
    fn test_extraction_is_lazy() {
        let mut arguments = extract(&test_descriptor(), DEFAULT_IGNORED_ARGUMENTS);
        assert_eq!(arguments.next(), Some("a"));
        assert_eq!(arguments.next(), Some("b"));
    }

    #[test]
    fn test_builtin_backends() {
        let arguments: Vec<&str> =
            extract(&FileSystemStorage::descriptor(), DEFAULT_IGNORED_ARGUMENTS).collect();
        assert_eq!(arguments, ["path"]);

        let descriptor = MemoryStorage::descriptor();
        assert_eq!(extract(&descriptor, DEFAULT_IGNORED_ARGUMENTS).count(), 0);
    }
}
