//! Built-in storage backends.
//!
//! - `file_system`: local directory tree
//! - `amazon_s3`: S3-compatible object storage
//! - `google_cloud`: Google Cloud Storage buckets
//! - `memory`: in-process map, no configuration

pub mod amazon_s3;
pub mod file_system;
pub mod google_cloud;
pub mod memory;

pub use amazon_s3::AmazonS3Storage;
pub use file_system::FileSystemStorage;
pub use google_cloud::GoogleCloudStorage;
pub use memory::MemoryStorage;

use depot_common::{Error, WriteMode};
use opendal::{ErrorKind, Operator};

use crate::backend::{Backend, BackendDescriptor};

/// Descriptors of every built-in backend.
pub fn default_backends() -> Vec<BackendDescriptor> {
    vec![
        FileSystemStorage::descriptor(),
        AmazonS3Storage::descriptor(),
        GoogleCloudStorage::descriptor(),
        MemoryStorage::descriptor(),
    ]
}

/// Translate an OpenDAL error on `name` into the storage error taxonomy.
pub(crate) fn map_object_error(name: &str, err: opendal::Error) -> Error {
    match err.kind() {
        ErrorKind::NotFound => Error::NotFound(format!("Object not found: {}", name)),
        ErrorKind::AlreadyExists | ErrorKind::ConditionNotMatch => {
            Error::AlreadyExists(format!("Object already exists: {}", name))
        }
        ErrorKind::Unsupported => Error::Unsupported(err.to_string()),
        _ => Error::Backend(err.to_string()),
    }
}

/// Apply write-mode semantics shared by the object stores.
///
/// Object stores replace whole objects: `Append` has no equivalent, and
/// `CreateNew` is a probe followed by an unconditional put, so it is not
/// atomic against concurrent writers.
pub(crate) async fn check_object_write_mode(
    operator: &Operator,
    service: &str,
    name: &str,
    mode: WriteMode,
) -> depot_common::Result<()> {
    match mode {
        WriteMode::Append => Err(Error::Unsupported(format!(
            "{} does not support appending to objects.",
            service
        ))),
        WriteMode::CreateNew => match operator.stat(name).await {
            Ok(_) => Err(Error::AlreadyExists(format!("Object already exists: {}", name))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_object_error(name, e)),
        },
        WriteMode::Overwrite => Ok(()),
    }
}
