//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("Already installed {package}")]
    AlreadyInstalled { package: String },

    #[error("Not installed {package}")]
    NotInstalled { package: String },

    #[error("no package is currently in use")]
    NoCurrentPackage,

    #[error("recipe repository not configured")]
    RecipesNotConfigured,

    #[error("initialization failed: {message}")]
    InitializationFailed { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyInstalled { .. } => {
                Some("Pass --force to reinstall or --skip to ignore installed packages.")
            }
            Self::NotInstalled { .. } => Some("Install it first with `evm install <name>`."),
            Self::NoCurrentPackage => Some("Select a version with `evm use <name>`."),
            Self::RecipesNotConfigured => {
                Some("Set `recipes.url` in config.toml or EVM_RECIPES_URL.")
            }
            Self::InitializationFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::AlreadyInstalled { .. } => "ops.already_installed",
            Self::NotInstalled { .. } => "ops.not_installed",
            Self::NoCurrentPackage => "ops.no_current_package",
            Self::RecipesNotConfigured => "ops.recipes_not_configured",
            Self::InitializationFailed { .. } => "ops.initialization_failed",
        };
        Some(code)
    }
}
