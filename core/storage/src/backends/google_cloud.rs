//! Google Cloud Storage backend.

use async_trait::async_trait;
use base64::prelude::*;
use chrono::{DateTime, Utc};
use opendal::layers::LoggingLayer;
use opendal::services::Gcs;
use opendal::{ErrorKind, Operator};
use std::any::Any;

use depot_common::{Content, Error, ReadMode, Result, WriteMode};

use super::{check_object_write_mode, map_object_error};
use crate::backend::{require, Arguments, Backend, Parameter};
use crate::storage::Storage;

const SERVICE_NAME: &str = "Google Cloud Storage";

/// Google Cloud Storage backend.
///
/// Authenticates with a service account key supplied as base64-encoded JSON.
pub struct GoogleCloudStorage {
    bucket_name: String,
    operator: Operator,
}

impl GoogleCloudStorage {
    /// Create a new GCS backend.
    ///
    /// # Errors
    /// - `Error::Configuration` naming the first empty parameter
    /// - `Error::Configuration` if the credentials are not base64-encoded JSON
    /// - `Error::Backend` if the client cannot be built
    pub fn new(
        google_cloud_credentials: impl Into<String>,
        google_cloud_bucket_name: impl Into<String>,
    ) -> Result<Self> {
        let credentials = require("google_cloud_credentials", google_cloud_credentials)?;
        let bucket_name = require("google_cloud_bucket_name", google_cloud_bucket_name)?;
        validate_credentials(&credentials)?;

        let builder = Gcs::default().bucket(&bucket_name).credential(&credentials);

        let operator = Operator::new(builder)
            .map_err(|e| Error::Backend(format!("Failed to build GCS client: {}", e)))?
            .layer(LoggingLayer::default())
            .finish();

        Ok(Self {
            bucket_name,
            operator,
        })
    }

    /// Bucket this backend reads and writes.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Fetch the blob's metadata record.
    async fn blob(&self, name: &str) -> Result<opendal::Metadata> {
        match self.operator.stat(name).await {
            Ok(metadata) => Ok(metadata),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(format!(
                "No such object: {}/{}",
                self.bucket_name, name
            ))),
            Err(e) => Err(map_object_error(name, e)),
        }
    }

    async fn updated(&self, name: &str) -> Result<DateTime<Utc>> {
        self.blob(name).await?.last_modified().ok_or_else(|| {
            Error::Backend(format!("No update time returned for {}", name))
        })
    }
}

/// The credential blob must decode to a JSON object.
fn validate_credentials(credentials: &str) -> Result<()> {
    let invalid = || Error::Configuration("google_cloud_credentials".to_string());
    let decoded = BASE64_STANDARD.decode(credentials).map_err(|_| invalid())?;
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&decoded)
        .map_err(|_| invalid())?;
    Ok(())
}

impl Backend for GoogleCloudStorage {
    const MODULE: &'static str = "depot.backends.google_cloud";
    const TYPE_NAME: &'static str = "GoogleCloudStorage";
    const PARAMETERS: &'static [Parameter] = &[
        Parameter::named("google_cloud_credentials"),
        Parameter::named("google_cloud_bucket_name"),
    ];

    fn from_arguments(mut arguments: Arguments) -> Result<Self> {
        Self::new(
            arguments.take("google_cloud_credentials")?,
            arguments.take("google_cloud_bucket_name")?,
        )
    }
}

#[async_trait]
impl Storage for GoogleCloudStorage {
    fn name(&self) -> &str {
        "google_cloud"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn read(&self, name: &str, mode: ReadMode) -> Result<Content> {
        let data = self
            .operator
            .read(name)
            .await
            .map_err(|e| map_object_error(name, e))?;
        Content::from_bytes(data.to_vec(), mode)
    }

    async fn write(&self, name: &str, content: Content, mode: WriteMode) -> Result<()> {
        check_object_write_mode(&self.operator, SERVICE_NAME, name, mode).await?;
        self.operator
            .write(name, content.into_bytes())
            .await
            .map_err(|e| map_object_error(name, e))?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        // Missing objects are treated as already deleted.
        self.operator
            .delete(name)
            .await
            .map_err(|e| map_object_error(name, e))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        self.operator
            .exists(name)
            .await
            .map_err(|e| map_object_error(name, e))
    }

    async fn size(&self, name: &str) -> Result<u64> {
        Ok(self.blob(name).await?.content_length())
    }

    async fn get_created_time(&self, name: &str) -> Result<DateTime<Utc>> {
        // The metadata record is fetched so a missing object is still NotFound;
        // the client does not expose the record's creation time.
        self.blob(name).await?;
        Err(Error::Unsupported(format!(
            "{} client does not provide created time info.",
            SERVICE_NAME
        )))
    }

    async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>> {
        self.updated(name).await
    }

    async fn get_access_time(&self, _name: &str) -> Result<DateTime<Utc>> {
        Err(Error::Unsupported(format!(
            "{} does not provide access time info.",
            SERVICE_NAME
        )))
    }
}
