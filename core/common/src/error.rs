//! Common error types for Depot.

use thiserror::Error;

/// Top-level error type for Depot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend constructor received an empty or missing parameter.
    #[error("The '{0}' setting has improper value")]
    Configuration(String),

    /// A required configuration key is absent from the namespace.
    #[error("The environment variable '{0}' is not defined")]
    MissingConfiguration(String),

    /// A class path could not be resolved to a registered backend.
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Object not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend has no equivalent for the requested capability.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vendor client reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error signals a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Whether this error signals an absent capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_setting() {
        let err = Error::Configuration("bucket_name".to_string());
        assert_eq!(err.to_string(), "The 'bucket_name' setting has improper value");

        let err = Error::MissingConfiguration("STORAGES_PATH".to_string());
        assert_eq!(
            err.to_string(),
            "The environment variable 'STORAGES_PATH' is not defined"
        );
    }

    #[test]
    fn test_classification() {
        assert!(Error::NotFound("a".to_string()).is_not_found());
        assert!(!Error::NotFound("a".to_string()).is_unsupported());
        assert!(Error::Unsupported("atime".to_string()).is_unsupported());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
