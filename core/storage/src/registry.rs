//! Backend registry for class-path resolution.

use std::collections::HashMap;

use depot_common::{Error, Result};

use crate::backend::BackendDescriptor;
use crate::backends::default_backends;

const PATH_DELIMITER: char = '.';

/// Registry of provisionable backends, addressed by class path.
///
/// A class path has the form `<dotted.module.path>.<TypeName>`. Backends are
/// grouped by module so that resolution mirrors "find the module, then the
/// type in it".
#[derive(Debug, Default)]
pub struct BackendRegistry {
    modules: HashMap<String, HashMap<String, BackendDescriptor>>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in backend.
    pub fn with_default_backends() -> Self {
        let mut registry = Self::new();
        for descriptor in default_backends() {
            registry.insert(descriptor);
        }
        registry
    }

    /// Register a backend under its class path.
    ///
    /// # Errors
    /// - Returns error if the class path is already registered
    pub fn register(&mut self, descriptor: BackendDescriptor) -> Result<()> {
        if self.has_backend(&descriptor.path()) {
            return Err(Error::AlreadyExists(format!(
                "Backend '{}' is already registered",
                descriptor.path()
            )));
        }
        self.insert(descriptor);
        Ok(())
    }

    fn insert(&mut self, descriptor: BackendDescriptor) {
        self.modules
            .entry(descriptor.module().to_string())
            .or_default()
            .insert(descriptor.type_name().to_string(), descriptor);
    }

    /// Resolve a class path to a backend descriptor.
    ///
    /// # Errors
    /// - `Error::Resolution` if the path is malformed, the module is unknown,
    ///   or the module has no such type
    pub fn load(&self, path: &str) -> Result<BackendDescriptor> {
        let (module_name, type_name) = split_path(path)?;

        let module = self.modules.get(module_name).ok_or_else(|| {
            Error::Resolution(format!("No module named '{}'", module_name))
        })?;

        module.get(type_name).copied().ok_or_else(|| {
            Error::Resolution(format!(
                "Module '{}' has no backend '{}'",
                module_name, type_name
            ))
        })
    }

    /// Get the sorted list of registered class paths.
    pub fn backends(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .modules
            .values()
            .flat_map(|types| types.values().map(BackendDescriptor::path))
            .collect();
        paths.sort();
        paths
    }

    /// Check if a class path is registered.
    pub fn has_backend(&self, path: &str) -> bool {
        self.load(path).is_ok()
    }
}

/// Split a class path on its last delimiter into module and type name.
fn split_path(path: &str) -> Result<(&str, &str)> {
    match path.rsplit_once(PATH_DELIMITER) {
        Some((module, type_name)) if !module.is_empty() && !type_name.is_empty() => {
            Ok((module, type_name))
        }
        _ => Err(Error::Resolution(format!(
            "'{}' is not a class path of the form <module>.<TypeName>",
            path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::backends::{AmazonS3Storage, FileSystemStorage, GoogleCloudStorage, MemoryStorage};

    fn resolution_error(result: Result<BackendDescriptor>) -> String {
        match result {
            Err(Error::Resolution(message)) => message,
            other => panic!("expected resolution error, got {:?}", other),
        }
    }

    #[test]
    fn test_loader() {
        let registry = BackendRegistry::with_default_backends();
        let expected = [
            ("depot.backends.amazon_s3.AmazonS3Storage", AmazonS3Storage::TYPE_NAME),
            ("depot.backends.file_system.FileSystemStorage", FileSystemStorage::TYPE_NAME),
            ("depot.backends.google_cloud.GoogleCloudStorage", GoogleCloudStorage::TYPE_NAME),
            ("depot.backends.memory.MemoryStorage", MemoryStorage::TYPE_NAME),
        ];

        for (path, type_name) in expected {
            let descriptor = registry.load(path).unwrap();
            assert_eq!(descriptor.type_name(), type_name);
            assert_eq!(descriptor.path(), path);
        }
        assert_eq!(registry.backends().len(), expected.len());
    }

    #[test]
    fn test_malformed_paths() {
        let registry = BackendRegistry::with_default_backends();
        for path in ["", "FileSystemStorage", ".FileSystemStorage", "depot.backends."] {
            let message = resolution_error(registry.load(path));
            assert!(message.contains("not a class path"), "{}", message);
        }
    }

    #[test]
    fn test_unknown_module() {
        let registry = BackendRegistry::with_default_backends();
        let message = resolution_error(registry.load("depot.backends.ftp.FtpStorage"));
        assert!(message.contains("No module named 'depot.backends.ftp'"));
    }

    #[test]
    fn test_unknown_type() {
        let registry = BackendRegistry::with_default_backends();
        let message = resolution_error(registry.load("depot.backends.file_system.Nope"));
        assert!(message.contains("has no backend 'Nope'"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = BackendRegistry::new();
        registry.register(MemoryStorage::descriptor()).unwrap();

        let result = registry.register(MemoryStorage::descriptor());
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
    }

    #[test]
    fn test_same_module_holds_several_types() {
        let mut registry = BackendRegistry::new();
        let memory = MemoryStorage::descriptor();
        let alias = BackendDescriptor::new(
            memory.module(),
            "ScratchStorage",
            memory.parameters(),
            |_| Ok(std::sync::Arc::new(MemoryStorage::new())),
        );
        registry.register(memory).unwrap();
        registry.register(alias).unwrap();

        assert_eq!(
            registry.backends(),
            [
                "depot.backends.memory.MemoryStorage",
                "depot.backends.memory.ScratchStorage"
            ]
        );
        assert!(registry.has_backend("depot.backends.memory.ScratchStorage"));
    }
}
