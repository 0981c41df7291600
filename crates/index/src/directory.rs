//! Catalog backed by a directory of YAML recipe files

use crate::RecipeCatalog;
use async_trait::async_trait;
use evm_errors::{Error, PackageError};
use evm_platform::filesystem_helpers as fs;
use evm_types::{validate_name, Recipe};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;
use tracing::debug;

/// Every `*.yml` / `*.yaml` file in `dir` is one recipe; ordered by name
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load(&self) -> Result<Vec<Recipe>, Error> {
        if !fs::is_dir(&self.dir).await {
            debug!(dir = %self.dir.display(), "recipes directory missing, catalog is empty");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = tokio_fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.dir))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, &self.dir))?
        {
            let path = entry.path();
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if is_file && is_recipe_file(&path) {
                files.push(path);
            }
        }

        let mut recipes = Vec::with_capacity(files.len());
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        for path in files {
            let contents = fs::read_to_string(&path).await?;
            let recipe = Recipe::from_yaml(&contents).map_err(|e| PackageError::InvalidRecipe {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            validate_name(&recipe.name).map_err(|reason| PackageError::InvalidRecipe {
                path: path.display().to_string(),
                message: format!("{reason}: {:?}", recipe.name),
            })?;

            if let Some(first) = seen.get(&recipe.name) {
                return Err(PackageError::DuplicateRecipe {
                    name: recipe.name,
                    path: format!("{} and {}", first.display(), path.display()),
                }
                .into());
            }
            seen.insert(recipe.name.clone(), path);
            recipes.push(recipe);
        }

        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir = %self.dir.display(), count = recipes.len(), "loaded recipe catalog");
        Ok(recipes)
    }
}

fn is_recipe_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    )
}

#[async_trait]
impl RecipeCatalog for DirectoryCatalog {
    async fn find(&self, name: &str) -> Result<Option<Recipe>, Error> {
        Ok(self.load().await?.into_iter().find(|r| r.name == name))
    }

    async fn all(&self) -> Result<Vec<Recipe>, Error> {
        self.load().await
    }
}
