#![allow(clippy::module_name_repetitions)]

//! Filesystem convenience helpers.
//!
//! These functions provide a stable API returning `evm_errors::Error` with the
//! offending path attached, so callers never see a bare `io::Error`.

use evm_errors::{Error, StorageError};
use std::path::Path;
use tokio::fs;

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, Error>;

/// Mode applied to shim scripts
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Check if a path exists without following symlinks.
///
/// A dangling symlink counts as existing.
pub async fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).await.is_ok()
}

/// Check if a path is a directory (follows symlinks)
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Check if a path is a regular file with any execute bit set (follows symlinks)
pub async fn is_executable_file(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && has_execute_bit(&metadata),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_execute_bit(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_bit(_metadata: &std::fs::Metadata) -> bool {
    true
}

/// Create a single directory. The parent must already exist.
///
/// # Errors
///
/// Returns `StorageError::CreateDirFailed` (or a permission/disk-full variant)
/// if the directory cannot be created, including when the parent is missing.
pub async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path)
        .await
        .map_err(|e| StorageError::create_dir(&e, path).into())
}

/// Create a directory and all parent directories
///
/// # Errors
///
/// Returns an error if any component cannot be created.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| StorageError::create_dir(&e, path).into())
}

/// Remove a directory and all its contents
///
/// # Errors
///
/// Returns an error if the directory cannot be removed.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path)
        .await
        .map_err(|e| StorageError::remove(&e, path).into())
}

/// Remove a file or symlink
///
/// # Errors
///
/// Returns an error if the file cannot be removed.
pub async fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| StorageError::remove(&e, path).into())
}

/// Remove a directory tree if present, then recreate it empty
///
/// # Errors
///
/// Returns an error if removal or creation fails.
pub async fn ensure_empty_dir(path: &Path) -> Result<()> {
    if exists(path).await {
        remove_dir_all(path).await?;
    }
    create_dir_all(path).await
}

/// Write `contents` to `path` and mark it executable (`0o755`)
///
/// # Errors
///
/// Returns an error if the write or the permission change fails.
pub async fn write_executable(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .await
        .map_err(|e| Error::from(StorageError::write(&e, path)))?;
    set_mode(path, EXECUTABLE_MODE).await
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| StorageError::permissions(&e, path).into())
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Read a file into a string
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not UTF-8.
pub async fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}
