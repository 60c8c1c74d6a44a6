//! S3-compatible object storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opendal::layers::LoggingLayer;
use opendal::services::S3;
use opendal::{ErrorKind, Operator};
use std::any::Any;
use tracing::debug;

use depot_common::{Content, Error, ReadMode, Result, WriteMode};

use super::{check_object_write_mode, map_object_error};
use crate::backend::{require, Arguments, Backend, Parameter};
use crate::storage::Storage;

const SERVICE_NAME: &str = "S3 storage";

/// Region used when the environment names none; served by the global endpoint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible object storage backend.
///
/// The region comes from `AWS_REGION` (or `AWS_DEFAULT_REGION`) and falls
/// back to [`DEFAULT_REGION`]. A custom endpoint is picked up by the client
/// from `AWS_ENDPOINT_URL`.
pub struct AmazonS3Storage {
    bucket_name: String,
    region: String,
    operator: Operator,
}

impl AmazonS3Storage {
    /// Create a new S3 backend.
    ///
    /// # Errors
    /// - `Error::Configuration` naming the first empty parameter
    /// - `Error::Backend` if the client cannot be built
    pub fn new(
        aws_access_key_id: impl Into<String>,
        aws_secret_access_key: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Result<Self> {
        let aws_access_key_id = require("aws_access_key_id", aws_access_key_id)?;
        let aws_secret_access_key = require("aws_secret_access_key", aws_secret_access_key)?;
        let bucket_name = require("bucket_name", bucket_name)?;
        let region = region_or_default(
            std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .ok(),
        );

        let builder = S3::default()
            .bucket(&bucket_name)
            .region(&region)
            .access_key_id(&aws_access_key_id)
            .secret_access_key(&aws_secret_access_key);

        let operator = Operator::new(builder)
            .map_err(|e| Error::Backend(format!("Failed to build S3 client: {}", e)))?
            .layer(LoggingLayer::default())
            .finish();

        Ok(Self {
            bucket_name,
            region,
            operator,
        })
    }

    /// Bucket this backend reads and writes.
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Region the client signs requests for.
    pub fn region(&self) -> &str {
        &self.region
    }

    async fn stat(&self, name: &str) -> Result<opendal::Metadata> {
        self.operator
            .stat(name)
            .await
            .map_err(|e| map_object_error(name, e))
    }
}

fn region_or_default(region: Option<String>) -> String {
    region
        .filter(|region| !region.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

impl Backend for AmazonS3Storage {
    const MODULE: &'static str = "depot.backends.amazon_s3";
    const TYPE_NAME: &'static str = "AmazonS3Storage";
    const PARAMETERS: &'static [Parameter] = &[
        Parameter::named("aws_access_key_id"),
        Parameter::named("aws_secret_access_key"),
        Parameter::named("bucket_name"),
    ];

    fn from_arguments(mut arguments: Arguments) -> Result<Self> {
        Self::new(
            arguments.take("aws_access_key_id")?,
            arguments.take("aws_secret_access_key")?,
            arguments.take("bucket_name")?,
        )
    }
}

#[async_trait]
impl Storage for AmazonS3Storage {
    fn name(&self) -> &str {
        "amazon_s3"
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
        // S3 DELETE succeeds for missing keys.
        self.operator
            .delete(name)
            .await
            .map_err(|e| map_object_error(name, e))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        match self.operator.stat(name).await {
            Ok(_) => Ok(true),
            // Without s3:ListBucket a missing key answers 403, which surfaces
            // as PermissionDenied and is propagated rather than read as absent.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Object {} not found in bucket {}: {}", name, self.bucket_name, e);
                Ok(false)
            }
            Err(e) => Err(map_object_error(name, e)),
        }
    }

    async fn size(&self, name: &str) -> Result<u64> {
        Ok(self.stat(name).await?.content_length())
    }

    async fn get_created_time(&self, _name: &str) -> Result<DateTime<Utc>> {
        Err(Error::Unsupported(format!(
            "{} does not provide created time info.",
            SERVICE_NAME
        )))
    }

    async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>> {
        self.stat(name).await?.last_modified().ok_or_else(|| {
            Error::Backend(format!("No modification time returned for {}", name))
        })
    }

    async fn get_access_time(&self, _name: &str) -> Result<DateTime<Utc>> {
        Err(Error::Unsupported(format!(
            "{} does not provide access time info.",
            SERVICE_NAME
        )))
    }
}
