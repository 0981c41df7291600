//! Shared collaborators and fixed paths

use crate::shim::{FsShimWriter, ShimWriter};
use evm_builder::Builder;
use evm_config::fixed_paths;
use evm_index::RecipeCatalog;
use evm_platform::PlatformPredicate;
use evm_state::SettingsStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filesystem locations the lifecycle operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// One subdirectory per installed package, plus `tmp`
    pub base: PathBuf,
    /// Conventional shim, written only when nothing occupies it
    pub primary_shim: PathBuf,
    /// Tool-owned shim, always rewritten on activation
    pub managed_shim: PathBuf,
}

impl Layout {
    pub fn new(
        base: impl Into<PathBuf>,
        primary_shim: impl Into<PathBuf>,
        managed_shim: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base: base.into(),
            primary_shim: primary_shim.into(),
            managed_shim: managed_shim.into(),
        }
    }

    /// Installation directory of `name`
    #[must_use]
    pub fn install_root(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    /// Shared scratch directory handed to the builder
    #[must_use]
    pub fn tmp(&self) -> PathBuf {
        self.base.join(fixed_paths::TMP_DIR)
    }

    /// Shims in their default place under `home/bin`
    #[must_use]
    pub fn with_home(base: impl Into<PathBuf>, home: &Path) -> Self {
        let bin = home.join(fixed_paths::BIN_DIR);
        Self::new(
            base,
            bin.join(fixed_paths::APP_BINARY),
            bin.join(fixed_paths::MANAGED_SHIM),
        )
    }
}

/// Handles every [`crate::Package`] shares
pub struct PackageCtx {
    pub layout: Layout,
    pub catalog: Arc<dyn RecipeCatalog>,
    pub builder: Arc<dyn Builder>,
    pub platform: Arc<dyn PlatformPredicate>,
    pub settings: Arc<dyn SettingsStore>,
    pub shims: Arc<dyn ShimWriter>,
}

impl PackageCtx {
    /// Context writing shims to the real filesystem
    pub fn new(
        layout: Layout,
        catalog: Arc<dyn RecipeCatalog>,
        builder: Arc<dyn Builder>,
        platform: Arc<dyn PlatformPredicate>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            layout,
            catalog,
            builder,
            platform,
            settings,
            shims: Arc::new(FsShimWriter),
        }
    }

    /// Replace the shim writer
    #[must_use]
    pub fn with_shims(mut self, shims: Arc<dyn ShimWriter>) -> Self {
        self.shims = shims;
        self
    }
}

impl std::fmt::Debug for PackageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageCtx")
            .field("layout", &self.layout)
            .field("platform", &self.platform.family())
            .finish_non_exhaustive()
    }
}
