//! Durable key-value storage for store snapshots.
//!
//! Each store serializes its entire state to a fixed namespace on every
//! mutation and reads it back once at startup. The backend is addressed by
//! namespace string only; callers never see file paths.

mod error;

pub use error::StorageError;

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Namespace the auth/company store persists under.
pub const AUTH_NAMESPACE: &str = "auth-storage";

/// Namespace the document store persists under.
pub const DOCUMENT_NAMESPACE: &str = "document-storage";

/// Byte store addressable by a namespace string.
///
/// `write` replaces the whole blob for the namespace; `read` returns `None`
/// when the namespace has never been written.
pub trait Storage: Send + Sync {
    fn write(&self, namespace: &str, blob: &[u8]) -> Result<(), StorageError>;
    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

/// File-backed storage keeping one JSON blob file per namespace.
///
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Return a new instance rooted at the given directory, creating the
    /// directory if it does not exist yet.
    ///
    pub fn new(dir: &Path) -> Result<FileStorage, StorageError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StorageError::CreateDirectoryFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        Ok(FileStorage {
            dir: dir.to_path_buf(),
        })
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }
}

impl Storage for FileStorage {
    fn write(&self, namespace: &str, blob: &[u8]) -> Result<(), StorageError> {
        let path = self.namespace_path(namespace);
        let mut file = fs::File::create(&path).map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            source: e,
        })?;
        file.write_all(blob).map_err(|e| StorageError::WriteFailed {
            path: path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| StorageError::WriteFailed {
            path,
            source: e,
        })?;
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read(&path).map_err(|e| StorageError::ReadFailed { path, source: e })?;
        Ok(Some(blob))
    }
}

/// In-memory storage used by tests and previews.
///
#[derive(Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn write(&self, namespace: &str, blob: &[u8]) -> Result<(), StorageError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| StorageError::WriteFailed {
                path: PathBuf::from(namespace),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })?;
        blobs.insert(namespace.to_string(), blob.to_vec());
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| StorageError::ReadFailed {
                path: PathBuf::from(namespace),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })?;
        Ok(blobs.get(namespace).cloned())
    }
}
