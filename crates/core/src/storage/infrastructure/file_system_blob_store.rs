use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::storage::domain::blob_store::{BlobStore, StorageError};

const SUFFIX_LEN: usize = 7;
const MAX_NAME_ATTEMPTS: usize = 16;

/// Stores blobs as files under a media root directory.
///
/// Files are created with `create_new`, so a concurrent save of the same
/// name picks a different suffix instead of clobbering the other write.
pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlobStore for FileSystemBlobStore {
    fn save(&self, relative_path: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        let relative = checked_relative(relative_path)?;
        let full = self.root.join(&relative);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut candidate = relative.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            match write_new(&self.root.join(&candidate), content) {
                Ok(()) => {
                    log::debug!("Stored {} bytes at {}", content.len(), candidate.display());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = with_random_suffix(&relative);
                }
                Err(e) => return Err(io_error(&self.root.join(&candidate), e)),
            }
        }
        Err(StorageError::Io {
            path: full,
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free name available"),
        })
    }

    fn resolve(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }
}

fn checked_relative(relative_path: &str) -> Result<PathBuf, StorageError> {
    let path = PathBuf::from(relative_path);
    let only_normal = path.components().all(|c| matches!(c, Component::Normal(_)));
    if relative_path.is_empty() || !only_normal {
        return Err(StorageError::InvalidPath(path));
    }
    Ok(path)
}

fn write_new(path: &Path, content: &[u8]) -> std::io::Result<()> {
    create_and_fill(path, |file| {
        file.write_all(content)?;
        file.flush()
    })
}

/// Creates `path` exclusively and runs `fill` on it. A file that was created
/// but not fully written is removed again.
fn create_and_fill(
    path: &Path,
    fill: impl FnOnce(&mut fs::File) -> std::io::Result<()>,
) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    let result = fill(&mut file);
    drop(file);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

/// `dir/name.ext` → `dir/name_abc1234.ext`
fn with_random_suffix(relative: &Path) -> PathBuf {
    let suffix: String = Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string();
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match relative.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    };
    relative.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    if source.kind() == ErrorKind::NotFound {
        StorageError::NotFound {
            path: path.to_path_buf(),
            source,
        }
    } else {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
