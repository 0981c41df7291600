//! Package-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PackageError {
    #[error("No such package: {name}")]
    NotFound { name: String },

    #[error("invalid recipe {path}: {message}")]
    InvalidRecipe { path: String, message: String },

    #[error("duplicate recipe name {name} in {path}")]
    DuplicateRecipe { name: String, path: String },
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Run `evm list` to see available packages or `evm update` to refresh recipes.")
            }
            Self::InvalidRecipe { .. } | Self::DuplicateRecipe { .. } => {
                Some("Fix the recipe file or run `evm update` to restore the recipe catalog.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "package.not_found",
            Self::InvalidRecipe { .. } => "package.invalid_recipe",
            Self::DuplicateRecipe { .. } => "package.duplicate_recipe",
        };
        Some(code)
    }
}
