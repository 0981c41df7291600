//! Storage and filesystem-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to create directory {path}: {message}")]
    CreateDirFailed { path: String, message: String },

    #[error("failed to remove {path}: {message}")]
    RemoveFailed { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("failed to set permissions on {path}: {message}")]
    PermissionsFailed { path: String, message: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("disk full: {path}")]
    DiskFull { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        // Without a known path, avoid inventing placeholders; preserve message only
        Self::IoError {
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Directory creation failure with the offending path
    #[must_use]
    pub fn create_dir(err: &std::io::Error, path: &std::path::Path) -> Self {
        Self::classify(err, path).unwrap_or_else(|| Self::CreateDirFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Removal failure with the offending path
    #[must_use]
    pub fn remove(err: &std::io::Error, path: &std::path::Path) -> Self {
        Self::classify(err, path).unwrap_or_else(|| Self::RemoveFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Write failure with the offending path
    #[must_use]
    pub fn write(err: &std::io::Error, path: &std::path::Path) -> Self {
        Self::classify(err, path).unwrap_or_else(|| Self::WriteFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Permission-bit change failure with the offending path
    #[must_use]
    pub fn permissions(err: &std::io::Error, path: &std::path::Path) -> Self {
        Self::classify(err, path).unwrap_or_else(|| Self::PermissionsFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn classify(err: &std::io::Error, path: &std::path::Path) -> Option<Self> {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Some(Self::PermissionDenied {
                path: path.display().to_string(),
            }),
            std::io::ErrorKind::StorageFull => Some(Self::DiskFull {
                path: path.display().to_string(),
            }),
            _ => None,
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DiskFull { .. } => Some("Free up disk space and retry."),
            Self::PermissionDenied { .. } => Some(
                "Adjust filesystem permissions or point `paths.installations` at a writable directory.",
            ),
            Self::CreateDirFailed { .. } => {
                Some("Make sure the parent directory exists (see `evm config path`).")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::CreateDirFailed { .. } => "storage.create_dir_failed",
            Self::RemoveFailed { .. } => "storage.remove_failed",
            Self::WriteFailed { .. } => "storage.write_failed",
            Self::PermissionsFailed { .. } => "storage.permissions_failed",
            Self::PermissionDenied { .. } => "storage.permission_denied",
            Self::DiskFull { .. } => "storage.disk_full",
            Self::IoError { .. } => "storage.io_error",
        };
        Some(code)
    }
}
