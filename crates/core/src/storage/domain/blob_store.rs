use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid storage path: {0}")]
    InvalidPath(PathBuf),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable blob storage addressed by paths relative to a storage root.
pub trait BlobStore: Send + Sync {
    /// Stores `content` at or near `relative_path` and returns the relative
    /// path actually used. Existing blobs are never overwritten.
    fn save(&self, relative_path: &str, content: &[u8]) -> Result<PathBuf, StorageError>;

    /// Absolute location of a stored blob.
    fn resolve(&self, relative_path: &std::path::Path) -> PathBuf;
}
