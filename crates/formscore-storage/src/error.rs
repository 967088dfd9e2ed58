//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Reference not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Corrupt reference document {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Reference document {key} has format version {found}, expected {expected}")]
    VersionMismatch { key: String, found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Failures of the underlying medium, which may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
