//! Local filesystem storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use depot_common::{Content, Error, ReadMode, Result, WriteMode};

use crate::backend::{require, Arguments, Backend, Parameter};
use crate::storage::Storage;

/// Local filesystem storage backend.
///
/// Object names are joined with the root directory.
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    /// Create a new filesystem backend rooted at `path`.
    ///
    /// The directory is not touched until the first operation.
    ///
    /// # Errors
    /// - `Error::Configuration` if `path` is empty
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = require("path", path)?;
        Ok(Self {
            root: PathBuf::from(path),
        })
    }

    /// Root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn to_fs_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    async fn metadata(&self, name: &str) -> Result<std::fs::Metadata> {
        fs::metadata(self.to_fs_path(name))
            .await
            .map_err(|e| map_io_error(name, e))
    }
}

/// Translate an I/O error on `name` into the storage error taxonomy.
fn map_io_error(name: &str, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound(format!("File not found: {}", name)),
        io::ErrorKind::AlreadyExists => {
            Error::AlreadyExists(format!("File already exists: {}", name))
        }
        io::ErrorKind::Unsupported => Error::Unsupported(format!(
            "File system does not provide this information for {}: {}",
            name, err
        )),
        _ => Error::Io(err),
    }
}

fn to_datetime(name: &str, time: io::Result<SystemTime>) -> Result<DateTime<Utc>> {
    time.map(DateTime::<Utc>::from)
        .map_err(|e| map_io_error(name, e))
}

impl Backend for FileSystemStorage {
    const MODULE: &'static str = "depot.backends.file_system";
    const TYPE_NAME: &'static str = "FileSystemStorage";
    const PARAMETERS: &'static [Parameter] = &[Parameter::named("path")];

    fn from_arguments(mut arguments: Arguments) -> Result<Self> {
        Self::new(arguments.take("path")?)
    }
}

#[async_trait]
impl Storage for FileSystemStorage {
    fn name(&self) -> &str {
        "file_system"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn read(&self, name: &str, mode: ReadMode) -> Result<Content> {
        let data = fs::read(self.to_fs_path(name))
            .await
            .map_err(|e| map_io_error(name, e))?;
        Content::from_bytes(data, mode)
    }

    async fn write(&self, name: &str, content: Content, mode: WriteMode) -> Result<()> {
        let mut options = fs::OpenOptions::new();
        match mode {
            WriteMode::CreateNew => {
                options.write(true).create_new(true);
            }
            WriteMode::Overwrite => {
                options.write(true).create(true).truncate(true);
            }
            WriteMode::Append => {
                options.append(true).create(true);
            }
        }

        let mut file = options
            .open(self.to_fs_path(name))
            .await
            .map_err(|e| map_io_error(name, e))?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        fs::remove_file(self.to_fs_path(name))
            .await
            .map_err(|e| map_io_error(name, e))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        // Symlink metadata, so a dangling link still counts as present.
        Ok(fs::symlink_metadata(self.to_fs_path(name)).await.is_ok())
    }

    async fn size(&self, name: &str) -> Result<u64> {
        Ok(self.metadata(name).await?.len())
    }

    async fn get_created_time(&self, name: &str) -> Result<DateTime<Utc>> {
        to_datetime(name, self.metadata(name).await?.created())
    }

    async fn get_modified_time(&self, name: &str) -> Result<DateTime<Utc>> {
        to_datetime(name, self.metadata(name).await?.modified())
    }

    async fn get_access_time(&self, name: &str) -> Result<DateTime<Utc>> {
        to_datetime(name, self.metadata(name).await?.accessed())
    }
}
