//! Build system error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("build failed: {message}")]
    Failed { message: String },

    #[error("fetch failed: {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("step `{step}` failed with status {status}: {stderr}")]
    StepFailed {
        step: String,
        status: String,
        stderr: String,
    },

    #[error("recipe {recipe} has no build section for {platform}")]
    UnsupportedPlatform { recipe: String, platform: String },

    #[error("required tool not found: {tool}")]
    MissingTool { tool: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FetchFailed { .. } => Some("Check your network connection and the recipe URL."),
            Self::StepFailed { .. } => Some(
                "Inspect the build output, install missing build dependencies, then rerun the install.",
            ),
            Self::UnsupportedPlatform { .. } => {
                Some("Pick a recipe that supports this operating system.")
            }
            Self::MissingTool { .. } => Some("Install the missing tool and make sure it is on PATH."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Failed { .. } => "build.failed",
            Self::FetchFailed { .. } => "build.fetch_failed",
            Self::ExtractionFailed { .. } => "build.extraction_failed",
            Self::StepFailed { .. } => "build.step_failed",
            Self::UnsupportedPlatform { .. } => "build.unsupported_platform",
            Self::MissingTool { .. } => "build.missing_tool",
        };
        Some(code)
    }
}
