//! Source preparation: archive download and extraction, or git checkout

use crate::fetch::download_archive;
use crate::RecipeBuilder;
use evm_errors::{BuildError, Error};
use evm_platform::filesystem_helpers as fs;
use evm_platform::PlatformCommand;
use evm_types::{Recipe, Source};
use std::path::Path;
use tracing::debug;

impl RecipeBuilder {
    /// Populate `build_dir` with the recipe's sources
    pub(crate) async fn prepare_source(
        &self,
        recipe: &Recipe,
        tmp: &Path,
        build_dir: &Path,
    ) -> Result<(), Error> {
        match &recipe.source {
            Source::Git { git, reference } => {
                self.checkout(git, reference.as_deref(), build_dir).await
            }
            source => {
                let Some((url, ext)) = source.archive() else {
                    return Ok(());
                };
                let archive = tmp.join(format!("{}.{ext}", recipe.name));
                if fs::exists(&archive).await {
                    debug!(archive = %archive.display(), "archive already downloaded");
                } else {
                    download_archive(&self.client, url, &archive).await?;
                }
                fs::ensure_empty_dir(build_dir).await?;
                self.extract(&archive, build_dir).await
            }
        }
    }

    async fn extract(&self, archive: &Path, build_dir: &Path) -> Result<(), Error> {
        let mut cmd = PlatformCommand::new("tar");
        cmd.arg("-xf")
            .arg(archive.display().to_string())
            .arg("-C")
            .arg(build_dir.display().to_string())
            .arg("--strip-components=1");
        let output = self.run(cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(BuildError::ExtractionFailed {
                message: format!("{}: {}", archive.display(), output.stderr_lossy()),
            }
            .into())
        }
    }

    async fn checkout(
        &self,
        url: &str,
        reference: Option<&str>,
        build_dir: &Path,
    ) -> Result<(), Error> {
        let mut cmd = PlatformCommand::new("git");
        if fs::exists(build_dir).await {
            cmd.args(["pull", "--depth=1"]).current_dir(build_dir);
        } else {
            cmd.args(["clone", "--depth=1"]);
            if let Some(reference) = reference {
                cmd.args(["--branch", reference]);
            }
            cmd.arg(url).arg(build_dir.display().to_string());
        }

        let output = self.run(cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(BuildError::FetchFailed {
                url: url.to_string(),
                message: output.stderr_lossy(),
            }
            .into())
        }
    }
}
