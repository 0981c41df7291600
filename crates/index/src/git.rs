//! Shallow git checkout holding the recipe catalog

use evm_errors::{Error, PlatformError};
use evm_platform::filesystem_helpers as fs;
use evm_platform::{CommandOutput, PlatformCommand, ProcessOperations};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Clones and refreshes the recipes directory with `git --depth=1`
pub struct RecipeRepository {
    path: PathBuf,
    process: Arc<dyn ProcessOperations>,
}

impl RecipeRepository {
    pub fn new(path: impl Into<PathBuf>, process: Arc<dyn ProcessOperations>) -> Self {
        Self {
            path: path.into(),
            process,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the checkout directory exists
    pub async fn exists(&self) -> bool {
        fs::is_dir(&self.path).await
    }

    /// `git clone <url> <path> --depth=1`
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, `git` is
    /// missing, or the clone exits non-zero.
    pub async fn clone(&self, url: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        info!(url, path = %self.path.display(), "cloning recipes");
        let mut cmd = PlatformCommand::new("git");
        cmd.arg("clone")
            .arg(url)
            .arg(self.path.display().to_string())
            .arg("--depth=1");
        let output = self.process.execute_command(cmd).await?;
        check("git clone", &output)
    }

    /// `git pull --depth=1` inside the checkout
    ///
    /// # Errors
    ///
    /// Returns an error if `git` is missing or the pull exits non-zero.
    pub async fn pull(&self) -> Result<(), Error> {
        info!(path = %self.path.display(), "updating recipes");
        let mut cmd = PlatformCommand::new("git");
        cmd.args(["pull", "--depth=1"]).current_dir(&self.path);
        let output = self.process.execute_command(cmd).await?;
        check("git pull", &output)
    }
}

fn check(command: &str, output: &CommandOutput) -> Result<(), Error> {
    if output.success() {
        Ok(())
    } else {
        Err(PlatformError::ProcessExecutionFailed {
            command: command.to_string(),
            message: output.stderr_lossy(),
        }
        .into())
    }
}
