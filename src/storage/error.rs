//! Storage-specific error types.

use std::path::PathBuf;

/// Errors that can occur during durable storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to read a namespace blob
    #[error("Failed to read storage namespace from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a namespace blob
    #[error("Failed to write storage namespace to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the storage directory
    #[error("Failed to create storage directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize a store snapshot
    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize a store snapshot
    #[error("Failed to deserialize snapshot: {0}")]
    DeserializationFailed(String),
}
