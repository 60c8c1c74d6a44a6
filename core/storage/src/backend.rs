//! Constructor schemas and descriptors for provisionable backends.
//!
//! A backend declares the parameters its constructor needs as a static
//! schema. The provisioning pipeline reads that schema instead of inspecting
//! the constructor, resolves each parameter from the configuration
//! namespace, and calls the descriptor's constructor with the resulting
//! [`Arguments`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use depot_common::{Error, Result};

use crate::storage::Storage;

/// How a constructor parameter is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A plain parameter, supplied positionally or by name.
    Named,
    /// A catch-all parameter. Never collected from configuration.
    Variadic,
}

/// A single constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParameterKind,
}

impl Parameter {
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Named,
        }
    }

    pub const fn variadic(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Variadic,
        }
    }
}

/// Resolved constructor arguments, keyed by parameter name.
///
/// Consumed by value exactly once when the backend is constructed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: HashMap<String, String>,
}

impl Arguments {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Remove and return a value.
    ///
    /// # Errors
    /// - `Error::Configuration` naming the parameter if it is absent
    pub fn take(&mut self, name: &str) -> Result<String> {
        self.values
            .remove(name)
            .ok_or_else(|| Error::Configuration(name.to_string()))
    }

    /// Number of resolved arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the resolved arguments.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Values may carry secrets.
impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        write!(f, "Arguments({:?}, [REDACTED])", names)
    }
}

/// Constructor function stored in a descriptor.
pub type Constructor = fn(Arguments) -> Result<Arc<dyn Storage>>;

/// A backend that can be provisioned from configuration.
pub trait Backend: Storage + Sized + 'static {
    /// Dotted module path the backend is addressed under.
    const MODULE: &'static str;
    /// Type name the backend is addressed under.
    const TYPE_NAME: &'static str;
    /// Constructor parameters, in declaration order.
    const PARAMETERS: &'static [Parameter];

    /// Construct the backend from resolved arguments.
    ///
    /// # Errors
    /// - `Error::Configuration` if any parameter is missing or empty
    fn from_arguments(arguments: Arguments) -> Result<Self>;

    /// Descriptor for registering this backend.
    fn descriptor() -> BackendDescriptor {
        BackendDescriptor::new(
            Self::MODULE,
            Self::TYPE_NAME,
            Self::PARAMETERS,
            construct::<Self>,
        )
    }
}

fn construct<B: Backend>(arguments: Arguments) -> Result<Arc<dyn Storage>> {
    Ok(Arc::new(B::from_arguments(arguments)?))
}

/// Runtime-resolvable reference to a backend type.
#[derive(Debug, Clone, Copy)]
pub struct BackendDescriptor {
    module: &'static str,
    type_name: &'static str,
    parameters: &'static [Parameter],
    constructor: Constructor,
}

impl BackendDescriptor {
    pub fn new(
        module: &'static str,
        type_name: &'static str,
        parameters: &'static [Parameter],
        constructor: Constructor,
    ) -> Self {
        Self {
            module,
            type_name,
            parameters,
            constructor,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Full class path, `<module>.<TypeName>`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.module, self.type_name)
    }

    pub fn parameters(&self) -> &'static [Parameter] {
        self.parameters
    }

    /// Construct the backend, consuming the argument bundle.
    pub fn construct(&self, arguments: Arguments) -> Result<Arc<dyn Storage>> {
        (self.constructor)(arguments)
    }
}

/// Take a parameter that must be present and non-empty.
pub(crate) fn require(name: &str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(Error::Configuration(name.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_value() {
        let mut arguments: Arguments = [("path", "/tmp/x")].into_iter().collect();
        assert_eq!(arguments.take("path").unwrap(), "/tmp/x");
        assert!(arguments.is_empty());

        let err = arguments.take("path").unwrap_err();
        assert!(matches!(err, Error::Configuration(name) if name == "path"));
    }

    #[test]
    fn test_debug_redacts_values() {
        let arguments: Arguments = [("aws_secret_access_key", "hunter2")].into_iter().collect();
        let rendered = format!("{:?}", arguments);
        assert!(rendered.contains("aws_secret_access_key"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_require_rejects_empty() {
        assert!(require("bucket_name", "bucket").is_ok());
        let err = require("bucket_name", "").unwrap_err();
        assert!(matches!(err, Error::Configuration(name) if name == "bucket_name"));
    }
}
