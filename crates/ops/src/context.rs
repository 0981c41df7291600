//! Operations context for dependency injection

use evm_errors::{Error, OpsError};
use evm_index::RecipeRepository;
use evm_package::PackageCtx;
use std::sync::Arc;

/// Operations context providing access to all components
pub struct OpsCtx {
    /// Lifecycle collaborators and layout
    pub package: Arc<PackageCtx>,
    /// Checkout the recipe catalog is read from
    pub recipes: RecipeRepository,
    /// Where the checkout is cloned from, if configured
    pub recipes_url: Option<String>,
}

/// Builder for [`OpsCtx`]
#[derive(Default)]
pub struct OpsContextBuilder {
    package: Option<Arc<PackageCtx>>,
    recipes: Option<RecipeRepository>,
    recipes_url: Option<String>,
}

impl OpsContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package_ctx(mut self, package: Arc<PackageCtx>) -> Self {
        self.package = Some(package);
        self
    }

    #[must_use]
    pub fn with_recipe_repository(mut self, recipes: RecipeRepository) -> Self {
        self.recipes = Some(recipes);
        self
    }

    #[must_use]
    pub fn with_recipes_url(mut self, url: Option<String>) -> Self {
        self.recipes_url = url;
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if a required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let package = self.package.ok_or_else(|| OpsError::InitializationFailed {
            message: "package context is required".to_string(),
        })?;
        let recipes = self.recipes.ok_or_else(|| OpsError::InitializationFailed {
            message: "recipe repository is required".to_string(),
        })?;

        Ok(OpsCtx {
            package,
            recipes,
            recipes_url: self.recipes_url,
        })
    }
}
