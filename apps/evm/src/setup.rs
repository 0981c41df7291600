//! System setup and initialization

use crate::error::CliError;
use evm_builder::RecipeBuilder;
use evm_config::{calculate_build_jobs, fixed_paths, Config};
use evm_index::{DirectoryCatalog, RecipeRepository};
use evm_ops::{OpsContextBuilder, OpsCtx};
use evm_package::{Layout, PackageCtx};
use evm_platform::filesystem_helpers as fs;
use evm_platform::{HostPlatform, HostProcessOperations, PlatformPredicate, ProcessOperations};
use evm_state::{JsonSettings, SettingKey, SettingsStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Wires production collaborators from the loaded configuration
pub struct SystemSetup {
    config: Config,
    stream_build_output: bool,
}

impl SystemSetup {
    /// Create new system setup
    pub fn new(config: Config, stream_build_output: bool) -> Self {
        Self {
            config,
            stream_build_output,
        }
    }

    /// Ensure directories exist and build the operations context
    pub async fn initialize(&self) -> Result<OpsCtx, CliError> {
        info!("Initializing evm");

        let home = self.config.home_path()?;
        let settings = Arc::new(JsonSettings::new(self.config.settings_path()?));
        let base = self.installation_base(settings.as_ref()).await?;
        self.ensure_directories(&home, &base).await?;

        let platform: Arc<dyn PlatformPredicate> = Arc::new(HostPlatform);
        let process: Arc<dyn ProcessOperations> = Arc::new(HostProcessOperations::new());
        let jobs = calculate_build_jobs(self.config.build.jobs);
        let builder = RecipeBuilder::new(Arc::clone(&platform), Arc::clone(&process), jobs)?
            .with_streamed_output(self.stream_build_output);

        let recipes_path = self.config.recipes_path()?;
        let layout = Layout::new(
            base,
            self.config.primary_shim_path()?,
            self.config.managed_shim_path()?,
        );
        debug!(?layout, jobs, recipes = %recipes_path.display(), "resolved layout");

        let package = PackageCtx::new(
            layout,
            Arc::new(DirectoryCatalog::new(&recipes_path)),
            Arc::new(builder),
            platform,
            settings,
        );

        let ctx = OpsContextBuilder::new()
            .with_package_ctx(Arc::new(package))
            .with_recipe_repository(RecipeRepository::new(recipes_path, process))
            .with_recipes_url(self.config.recipes.url.clone())
            .build()?;
        Ok(ctx)
    }

    /// The persisted `path` override wins over the configured base
    async fn installation_base(&self, settings: &JsonSettings) -> Result<PathBuf, CliError> {
        match settings.get(SettingKey::Path).await? {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(self.config.installations_path()?),
        }
    }

    async fn ensure_directories(&self, home: &Path, base: &Path) -> Result<(), CliError> {
        for dir in [
            home.to_path_buf(),
            home.join(fixed_paths::BIN_DIR),
            base.to_path_buf(),
        ] {
            if !fs::exists(&dir).await {
                debug!(path = %dir.display(), "creating directory");
                fs::create_dir_all(&dir).await.map_err(|e| {
                    CliError::Setup(format!("failed to create {}: {e}", dir.display()))
                })?;
            }
        }
        Ok(())
    }
}
