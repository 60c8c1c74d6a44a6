//! Common utilities and types shared across Depot crates.
//!
//! This module provides the error taxonomy used by every backend and by the
//! provisioning pipeline, plus the read/write mode and content types of the
//! storage contract.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Content, ReadMode, WriteMode};
