//! Storage provisioning from configuration.
//!
//! [`StorageProvider::provide`] turns a class path and a configuration
//! namespace into a ready-to-use backend:
//!
//! 1. resolve the class path in the [`BackendRegistry`]
//! 2. extract the backend's required parameter names
//! 3. collect their values from the [`Environment`]
//! 4. construct the backend with the resolved arguments
//!
//! Any failure aborts provisioning; no backend is partially configured.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, info};

use depot_common::{Error, Result};

use crate::environment::{self, Environment, ProcessEnvironment, DEFAULT_PREFIX};
use crate::extractor::{self, DEFAULT_IGNORED_ARGUMENTS};
use crate::registry::BackendRegistry;
use crate::storage::Storage;

/// Key, after the prefix, naming the backend class path to bootstrap.
pub const BACKEND_KEY: &str = "BACKEND";

/// The process-wide storage handle.
///
/// Built once at startup and passed to consumers; clones share the same
/// backend. The backend's configuration cannot change after construction.
#[derive(Clone)]
pub struct StorageHandle {
    backend_path: String,
    storage: Arc<dyn Storage>,
}

impl StorageHandle {
    /// Wrap an already constructed backend.
    pub fn new(backend_path: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self {
            backend_path: backend_path.into(),
            storage,
        }
    }

    /// Class path the backend was provisioned from.
    pub fn backend_path(&self) -> &str {
        &self.backend_path
    }

    /// Shared reference to the backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Borrow the backend as its concrete type.
    pub fn downcast_ref<T: Storage + 'static>(&self) -> Option<&T> {
        self.storage.as_any().downcast_ref::<T>()
    }
}

impl Deref for StorageHandle {
    type Target = dyn Storage;

    fn deref(&self) -> &Self::Target {
        self.storage.as_ref()
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageHandle")
            .field("backend_path", &self.backend_path)
            .field("backend", &self.storage.name())
            .finish()
    }
}

/// Provisions a storage backend from a class path and configuration.
pub struct StorageProvider {
    registry: BackendRegistry,
    environment: Box<dyn Environment>,
    prefix: String,
    ignored_arguments: &'static [&'static str],
}

impl StorageProvider {
    /// Create a provider over a registry and configuration namespace.
    pub fn new(registry: BackendRegistry, environment: impl Environment + 'static) -> Self {
        Self {
            registry,
            environment: Box::new(environment),
            prefix: DEFAULT_PREFIX.to_string(),
            ignored_arguments: DEFAULT_IGNORED_ARGUMENTS,
        }
    }

    /// Provider over the built-in backends and the process environment.
    pub fn from_env() -> Self {
        Self::new(BackendRegistry::with_default_backends(), ProcessEnvironment)
    }

    /// Use a different key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Use a different set of ignored parameter names.
    pub fn with_ignored_arguments(mut self, ignored: &'static [&'static str]) -> Self {
        self.ignored_arguments = ignored;
        self
    }

    /// Registry backends are resolved from.
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Construct the backend named by `backend_path`.
    ///
    /// # Errors
    /// - `Error::Resolution` if the class path cannot be resolved
    /// - `Error::MissingConfiguration` naming the first undefined key
    /// - `Error::Configuration` if the backend rejects a value
    pub fn provide(&self, backend_path: &str) -> Result<StorageHandle> {
        let descriptor = self.registry.load(backend_path)?;
        debug!("Resolved backend {}", descriptor.path());

        let names: Vec<&str> = extractor::extract(&descriptor, self.ignored_arguments).collect();
        debug!("Backend {} requires {:?}", backend_path, names);

        let arguments = environment::collect(&names, &self.prefix, self.environment.as_ref())?;
        let storage = descriptor.construct(arguments)?;
        info!("Provisioned {} storage from {}", storage.name(), backend_path);

        Ok(StorageHandle::new(backend_path, storage))
    }

    /// Provide the backend named by the `<PREFIX>BACKEND` key.
    ///
    /// # Errors
    /// - `Error::MissingConfiguration` if the key is not defined
    /// - Any error of [`StorageProvider::provide`]
    pub fn bootstrap(&self) -> Result<StorageHandle> {
        let key = format!("{}{}", self.prefix, BACKEND_KEY);
        let backend_path = self
            .environment
            .get(&key)
            .ok_or(Error::MissingConfiguration(key))?;
        self.provide(&backend_path)
    }
}
