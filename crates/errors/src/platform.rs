//! Platform-specific operation errors

use std::borrow::Cow;

use crate::{BuildError, UserFacingError};
use thiserror::Error;

/// Errors that can occur during platform-specific operations
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },
}

impl From<PlatformError> for BuildError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::ProcessExecutionFailed { command, message }
                if command.contains("git") =>
            {
                BuildError::Failed {
                    message: format!("git operation failed: {message}"),
                }
            }
            PlatformError::ProcessExecutionFailed { command, message }
                if command.contains("tar") =>
            {
                BuildError::ExtractionFailed { message }
            }
            PlatformError::CommandNotFound { command } => BuildError::MissingTool { tool: command },
            _ => BuildError::Failed {
                message: err.to_string(),
            },
        }
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some("Install the missing tool and make sure it is on PATH."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::CommandNotFound { .. } => "platform.command_not_found",
            Self::FilesystemOperationFailed { .. } => "platform.filesystem_failed",
        };
        Some(code)
    }
}
