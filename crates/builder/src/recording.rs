//! Builder fake that records calls instead of compiling anything

use crate::Builder;
use async_trait::async_trait;
use evm_errors::{BuildError, Error};
use evm_platform::filesystem_helpers as fs;
use evm_types::Recipe;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Arguments of one `build` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCall {
    pub recipe: String,
    pub install: PathBuf,
    pub tmp: PathBuf,
}

/// Records every build; optionally fails, optionally lays down an executable
/// `bin/emacs` so the result looks installed.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    calls: Mutex<Vec<BuildCall>>,
    fail_with: Option<String>,
    produce_binary: bool,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every build fails with `BuildError::Failed { message }`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    /// Successful builds write an executable `<install>/bin/emacs`
    #[must_use]
    pub fn producing_binary() -> Self {
        Self {
            produce_binary: true,
            ..Self::default()
        }
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Builder for RecordingBuilder {
    async fn build(&self, recipe: &Recipe, install: &Path, tmp: &Path) -> Result<(), Error> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(BuildCall {
                recipe: recipe.name.clone(),
                install: install.to_path_buf(),
                tmp: tmp.to_path_buf(),
            });
        }

        if let Some(message) = &self.fail_with {
            return Err(BuildError::Failed {
                message: message.clone(),
            }
            .into());
        }

        if self.produce_binary {
            let bin_dir = install.join("bin");
            fs::create_dir_all(&bin_dir).await?;
            fs::write_executable(&bin_dir.join("emacs"), "#!/bin/sh\necho emacs\n").await?;
        }
        Ok(())
    }
}
