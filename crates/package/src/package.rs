//! The package lifecycle state machine

use crate::context::PackageCtx;
use evm_config::fixed_paths;
use evm_errors::{Error, PackageError};
use evm_platform::filesystem_helpers as fs;
use evm_state::SettingKey;
use evm_types::{validate_name, Recipe};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// One named version of Emacs known to the recipe catalog
#[derive(Clone)]
pub struct Package {
    recipe: Recipe,
    ctx: Arc<PackageCtx>,
}

impl Package {
    /// Resolve `name` through the recipe catalog
    ///
    /// # Errors
    ///
    /// Returns `PackageError::NotFound` if the catalog has no such recipe,
    /// `PackageError::InvalidRecipe` if its name cannot be a directory under
    /// the base, or the catalog's own error if it cannot be read.
    pub async fn find(ctx: &Arc<PackageCtx>, name: &str) -> Result<Self, Error> {
        let recipe = ctx
            .catalog
            .find(name)
            .await?
            .ok_or_else(|| PackageError::NotFound {
                name: name.to_string(),
            })?;
        Self::from_recipe(recipe, ctx)
    }

    /// Every catalogued package, in catalog order
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn all(ctx: &Arc<PackageCtx>) -> Result<Vec<Self>, Error> {
        ctx.catalog
            .all()
            .await?
            .into_iter()
            .map(|recipe| Self::from_recipe(recipe, ctx))
            .collect()
    }

    /// Names that would escape or alias the base directory are refused
    fn from_recipe(recipe: Recipe, ctx: &Arc<PackageCtx>) -> Result<Self, Error> {
        validate_name(&recipe.name).map_err(|reason| PackageError::InvalidRecipe {
            path: recipe.name.clone(),
            message: reason.to_string(),
        })?;
        Ok(Self {
            recipe,
            ctx: Arc::clone(ctx),
        })
    }

    /// The package recorded as `current`, if any
    ///
    /// # Errors
    ///
    /// Returns `PackageError::NotFound` when the recorded name is no longer
    /// catalogued, or a settings error if the store cannot be read.
    pub async fn current(ctx: &Arc<PackageCtx>) -> Result<Option<Self>, Error> {
        match ctx.settings.get(SettingKey::Current).await? {
            Some(name) => Self::find(ctx, &name).await.map(Some),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.recipe.name
    }

    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Whether this package is the one recorded as `current`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Package::current`]; nothing recorded is
    /// simply `false`.
    pub async fn is_current(&self) -> Result<bool, Error> {
        Ok(Self::current(&self.ctx)
            .await?
            .is_some_and(|current| current.name() == self.name()))
    }

    /// Installation directory; pure path construction
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.ctx.layout.install_root(self.name())
    }

    /// The Emacs executable inside the installation directory.
    ///
    /// On macOS a bundle at `<root>/Emacs.app` takes precedence over
    /// `<root>/bin/emacs`. The bundle is probed on every call.
    pub async fn bin(&self) -> PathBuf {
        let root = self.path();
        if self.ctx.platform.is_macos() {
            let bundle = root.join(fixed_paths::APP_BUNDLE);
            if fs::exists(&bundle).await {
                return bundle
                    .join("Contents")
                    .join("MacOS")
                    .join(fixed_paths::BUNDLE_BINARY);
            }
        }
        root.join(fixed_paths::BIN_DIR).join(fixed_paths::APP_BINARY)
    }

    /// True iff the binary exists, is a regular file and is executable
    pub async fn is_installed(&self) -> bool {
        fs::is_executable_file(&self.bin().await).await
    }

    /// Create the installation and scratch directories if missing, then
    /// hand off to the builder.
    ///
    /// # Errors
    ///
    /// Returns a storage error if either directory cannot be created (the
    /// base directory must already exist), or the builder's error unchanged.
    pub async fn install(&self) -> Result<(), Error> {
        let root = self.path();
        if !fs::exists(&root).await {
            debug!(package = %self, path = %root.display(), "creating installation directory");
            fs::create_dir(&root).await?;
        }

        let tmp = self.ctx.layout.tmp();
        if !fs::exists(&tmp).await {
            debug!(path = %tmp.display(), "creating scratch directory");
            fs::create_dir(&tmp).await?;
        }

        info!(package = %self, "building");
        self.ctx.builder.build(&self.recipe, &root, &tmp).await?;
        info!(package = %self, "installed");
        Ok(())
    }

    /// Remove the installation directory. If this package is current, the
    /// managed shim goes too; the primary shim and `current` are left alone.
    ///
    /// # Errors
    ///
    /// Returns a storage error if removal fails, or the errors of
    /// [`Package::is_current`].
    pub async fn uninstall(&self) -> Result<(), Error> {
        let root = self.path();
        if fs::exists(&root).await {
            debug!(package = %self, path = %root.display(), "removing installation directory");
            fs::remove_dir_all(&root).await?;
        }

        if self.is_current().await? {
            let managed = &self.ctx.layout.managed_shim;
            if self.ctx.shims.exists(managed).await {
                self.ctx.shims.remove(managed).await?;
            }
        }

        info!(package = %self, "uninstalled");
        Ok(())
    }

    /// Point the shims at this package and record it as `current`.
    ///
    /// An occupied primary shim location is never overwritten, even by a
    /// shim for another package.
    ///
    /// # Errors
    ///
    /// Returns the first shim or settings error; earlier steps stay applied.
    pub async fn activate(&self) -> Result<(), Error> {
        let bin = self.bin().await;
        let layout = &self.ctx.layout;
        let shims = &self.ctx.shims;

        if shims.exists(&layout.primary_shim).await {
            debug!(shim = %layout.primary_shim.display(), "primary shim occupied, leaving it");
        } else {
            shims.write(&layout.primary_shim, &bin).await?;
        }

        if shims.exists(&layout.managed_shim).await {
            shims.remove(&layout.managed_shim).await?;
        }
        shims.write(&layout.managed_shim, &bin).await?;

        self.ctx
            .settings
            .set(SettingKey::Current, Some(self.name()))
            .await?;
        info!(package = %self, bin = %bin.display(), "activated");
        Ok(())
    }

    /// Same as [`deactivate`]; which package it is called on is irrelevant
    ///
    /// # Errors
    ///
    /// See [`deactivate`].
    pub async fn deactivate(&self) -> Result<(), Error> {
        deactivate(&self.ctx).await
    }
}

/// Remove both shims if present and clear `current`. Idempotent.
///
/// # Errors
///
/// Returns the first shim or settings error.
pub async fn deactivate(ctx: &PackageCtx) -> Result<(), Error> {
    for shim in [&ctx.layout.primary_shim, &ctx.layout.managed_shim] {
        if ctx.shims.exists(shim).await {
            ctx.shims.remove(shim).await?;
        }
    }
    ctx.settings.set(SettingKey::Current, None).await?;
    info!("deactivated");
    Ok(())
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.recipe.name)
            .finish_non_exhaustive()
    }
}
