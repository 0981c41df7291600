//! Forwarding shim scripts
//!
//! A shim is a two-line bash script that `exec`s a specific installed binary
//! with the caller's arguments. The exact bytes are fixed so that a shim
//! written by evm can be recognised again later.

use async_trait::async_trait;
use evm_errors::Error;
use evm_platform::filesystem_helpers as fs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

const SHEBANG: &str = "#!/bin/bash\n";
const EXEC_PREFIX: &str = "exec \"";
const EXEC_SUFFIX: &str = "\" \"$@\"";

/// Script forwarding every invocation to `bin`
#[must_use]
pub fn shim_script(bin: &Path) -> String {
    format!("{SHEBANG}{EXEC_PREFIX}{}{EXEC_SUFFIX}\n", bin.display())
}

/// Target of a script written by [`shim_script`], or `None` for anything else
#[must_use]
pub fn parse_shim_target(contents: &str) -> Option<PathBuf> {
    let line = contents.strip_prefix(SHEBANG)?.strip_suffix('\n')?;
    let target = line.strip_prefix(EXEC_PREFIX)?.strip_suffix(EXEC_SUFFIX)?;
    if target.is_empty() || target.contains('\n') {
        return None;
    }
    Some(PathBuf::from(target))
}

/// What currently occupies a shim location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimState {
    Absent,
    /// A script in the exact evm format, forwarding to this path
    Forwarding(PathBuf),
    /// Something evm did not write (user file, directory, symlink, ...)
    Foreign,
}

/// Creates and removes shims at fixed locations
#[async_trait]
pub trait ShimWriter: Send + Sync {
    /// Whether anything occupies `path`; a dangling symlink counts
    async fn exists(&self, path: &Path) -> bool;

    /// Write a shim at `path` forwarding to `bin` and mark it executable
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be written or chmodded.
    async fn write(&self, path: &Path, bin: &Path) -> Result<(), Error>;

    /// Delete whatever is at `path`
    ///
    /// # Errors
    ///
    /// Returns a storage error if removal fails.
    async fn remove(&self, path: &Path) -> Result<(), Error>;

    /// Inspect `path` without modifying it
    async fn inspect(&self, path: &Path) -> ShimState;
}

/// Shims on the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsShimWriter;

#[async_trait]
impl ShimWriter for FsShimWriter {
    async fn exists(&self, path: &Path) -> bool {
        fs::exists(path).await
    }

    async fn write(&self, path: &Path, bin: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !fs::exists(parent).await {
                fs::create_dir_all(parent).await?;
            }
        }
        debug!(shim = %path.display(), target = %bin.display(), "writing shim");
        fs::write_executable(path, &shim_script(bin)).await
    }

    async fn remove(&self, path: &Path) -> Result<(), Error> {
        debug!(shim = %path.display(), "removing shim");
        // A directory at a shim path is never ours to delete
        fs::remove_file(path).await
    }

    async fn inspect(&self, path: &Path) -> ShimState {
        if !fs::exists(path).await {
            return ShimState::Absent;
        }
        if is_symlink(path).await {
            return ShimState::Foreign;
        }
        match fs::read_to_string(path).await {
            Ok(contents) => {
                parse_shim_target(&contents).map_or(ShimState::Foreign, ShimState::Forwarding)
            }
            Err(_) => ShimState::Foreign,
        }
    }
}

async fn is_symlink(path: &Path) -> bool {
    tokio::fs::symlink_metadata(path)
        .await
        .is_ok_and(|m| m.file_type().is_symlink())
}

/// Shims held in memory, keyed by path
#[derive(Debug, Default)]
pub struct MemoryShimWriter {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryShimWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place arbitrary contents at `path`, as a user would
    pub async fn insert_raw(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.lock().await.insert(path.into(), contents.into());
    }

    /// Contents at `path`, if any
    pub async fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().await.get(path).cloned()
    }
}

#[async_trait]
impl ShimWriter for MemoryShimWriter {
    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().await.contains_key(path)
    }

    async fn write(&self, path: &Path, bin: &Path) -> Result<(), Error> {
        self.files
            .lock()
            .await
            .insert(path.to_path_buf(), shim_script(bin));
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), Error> {
        self.files.lock().await.remove(path);
        Ok(())
    }

    async fn inspect(&self, path: &Path) -> ShimState {
        match self.files.lock().await.get(path) {
            None => ShimState::Absent,
            Some(contents) => {
                parse_shim_target(contents).map_or(ShimState::Foreign, ShimState::Forwarding)
            }
        }
    }
}
