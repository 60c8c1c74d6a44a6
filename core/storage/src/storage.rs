//! Storage contract definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::any::Any;

use depot_common::{Content, ReadMode, Result, WriteMode};

/// Storage contract shared by every backend.
///
/// Each operation addresses an object by `name`, an opaque path-like key
/// whose interpretation is backend-specific. The contract is the lowest
/// common denominator of file and object stores: any timestamp accessor may
/// be unavailable, in which case it fails with `Error::Unsupported`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get the backend name (e.g., "file_system", "amazon_s3").
    fn name(&self) -> &str;

    /// Access the concrete backend, for callers that need to downcast.
    fn as_any(&self) -> &dyn Any;

    /// Read the stored content.
    ///
    /// # Errors
    /// - Object not found
    /// - Text mode and the object is not valid UTF-8
    async fn read(&self, name: &str, mode: ReadMode) -> Result<Content>;

    /// Store `content` under `name`.
    ///
    /// # Postconditions
    /// - The object is created, replaced or extended according to `mode`
    ///
    /// # Errors
    /// - `WriteMode::CreateNew` and the object already exists
    /// - The backend cannot honor `mode`
    async fn write(&self, name: &str, content: Content, mode: WriteMode) -> Result<()>;

    /// Delete an object.
    ///
    /// # Errors
    /// - Object not found, on backends that report it
    async fn delete(&self, name: &str) -> Result<()>;

    /// Check if an object exists. A missing object yields `false`.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Size of the object in bytes.
    async fn size(&self, name: &str) -> Result<u64>;

    /// Creation time of the object.
    async fn get_created_time(&self, name: &str) -> Result<DateTime<Utc>>;

    /// Last modification time of the object.
    async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>>;

    /// Last access time of the object.
    async fn get_access_time(&self, name: &str) -> Result<DateTime<Utc>>;
}
