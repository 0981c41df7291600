#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Recipe builder for evm
//!
//! Turns a [`Recipe`] into an installed tree: fetch the sources into
//! `<tmp>/<name>`, then run the host platform's steps (`autogen`,
//! `configure`, `make`, `copy`) inside that directory. Every external tool is
//! invoked through [`ProcessOperations`] so the whole pipeline can be
//! observed in tests.

mod fetch;
mod recording;
mod source;
mod steps;

pub use recording::{BuildCall, RecordingBuilder};
pub use steps::step_command;

use async_trait::async_trait;
use evm_errors::{BuildError, Error};
use evm_platform::{CommandOutput, PlatformCommand, PlatformPredicate, ProcessOperations};
use evm_types::Recipe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Performs the build of one package
#[async_trait]
pub trait Builder: Send + Sync {
    /// Build `recipe` into `install`, using `tmp` as scratch space.
    ///
    /// # Errors
    ///
    /// Returns a `BuildError` (or a storage error for the scratch directory)
    /// on the first failing stage.
    async fn build(&self, recipe: &Recipe, install: &Path, tmp: &Path) -> Result<(), Error>;
}

/// Production builder delegating to `git`, `tar`, `make` and friends
pub struct RecipeBuilder {
    platform: Arc<dyn PlatformPredicate>,
    process: Arc<dyn ProcessOperations>,
    client: reqwest::Client,
    jobs: usize,
    stream_output: bool,
}

impl RecipeBuilder {
    /// Create a builder running `jobs` parallel make jobs
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(
        platform: Arc<dyn PlatformPredicate>,
        process: Arc<dyn ProcessOperations>,
        jobs: usize,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("evm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BuildError::Failed {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            platform,
            process,
            client,
            jobs: jobs.max(1),
            stream_output: false,
        })
    }

    /// Stream tool output to the terminal instead of capturing it
    #[must_use]
    pub fn with_streamed_output(mut self, stream: bool) -> Self {
        self.stream_output = stream;
        self
    }

    /// Per-package build directory under the shared scratch directory
    #[must_use]
    pub fn build_dir(recipe: &Recipe, tmp: &Path) -> PathBuf {
        tmp.join(&recipe.name)
    }

    /// Run one command, mapping spawn failures to `BuildError`
    pub(crate) async fn run(&self, mut cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        cmd.inherit_output(self.stream_output);
        self.process
            .execute_command(cmd)
            .await
            .map_err(|e| match e {
                Error::Platform(platform) => BuildError::from(platform).into(),
                other => other,
            })
    }
}

#[async_trait]
impl Builder for RecipeBuilder {
    async fn build(&self, recipe: &Recipe, install: &Path, tmp: &Path) -> Result<(), Error> {
        let start = Instant::now();
        let family = self.platform.family();
        let plan = recipe
            .build_for(self.platform.is_macos())
            .ok_or_else(|| BuildError::UnsupportedPlatform {
                recipe: recipe.name.clone(),
                platform: family.to_string(),
            })?;

        let build_dir = Self::build_dir(recipe, tmp);
        info!(package = %recipe.name, platform = %family, build_dir = %build_dir.display(), "starting build");

        self.prepare_source(recipe, tmp, &build_dir).await?;

        for step in &plan.steps {
            let cmd = step_command(step, &plan.options, install, &build_dir, self.jobs);
            debug!(package = %recipe.name, step = %step, command = %cmd.display(), "running step");
            let output = self.run(cmd).await?;
            if !output.success() {
                return Err(BuildError::StepFailed {
                    step: step.to_string(),
                    status: output
                        .status
                        .code()
                        .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    stderr: output.stderr_lossy(),
                }
                .into());
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(package = %recipe.name, duration_ms, "build finished");
        Ok(())
    }
}
