//! Storage abstraction and provisioning for Depot.
//!
//! This crate provides a trait-based contract over heterogeneous storage
//! backends (local filesystem, S3-compatible object storage, Google Cloud
//! Storage) and a provisioning pipeline that builds exactly one backend from
//! a class path and a flat configuration namespace.
//!
//! # Design Principles
//! - Lowest common denominator: eight operations every backend honors
//! - Capability honesty: absent capabilities fail with `Unsupported`
//! - Fail fast: configuration is validated before any I/O
//! - Static schemas: backends declare their constructor parameters

pub mod backend;
pub mod backends;
pub mod environment;
pub mod extractor;
pub mod provider;
pub mod registry;
pub mod storage;

pub use backend::{Arguments, Backend, BackendDescriptor, Parameter, ParameterKind};
pub use backends::{AmazonS3Storage, FileSystemStorage, GoogleCloudStorage, MemoryStorage};
pub use environment::{Environment, ProcessEnvironment, DEFAULT_PREFIX};
pub use extractor::DEFAULT_IGNORED_ARGUMENTS;
pub use provider::{StorageHandle, StorageProvider, BACKEND_KEY};
pub use registry::BackendRegistry;
pub use storage::Storage;
