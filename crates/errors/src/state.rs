//! Persisted settings error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StateError {
    #[error("failed to read settings {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("settings corrupted in {path}: {message}")]
    Corrupted { path: String, message: String },

    #[error("failed to persist settings {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("unknown setting: {key}")]
    UnknownKey { key: String },
}

impl UserFacingError for StateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ReadFailed { .. } => "state.read_failed",
            Self::Corrupted { .. } => "state.corrupted",
            Self::WriteFailed { .. } => "state.write_failed",
            Self::UnknownKey { .. } => "state.unknown_key",
        };
        Some(code)
    }
}
