//! In-memory catalog preserving insertion order

use crate::RecipeCatalog;
use async_trait::async_trait;
use evm_errors::Error;
use evm_types::Recipe;

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    recipes: Vec<Recipe>,
}

impl MemoryCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Catalog of archive recipes with the given names, for tests
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let recipes = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let url = format!("https://ftpmirror.gnu.org/emacs/{name}.tar.gz");
                Recipe::new(name, evm_types::Source::TarGz { tar_gz: url })
            })
            .collect();
        Self { recipes }
    }
}

#[async_trait]
impl RecipeCatalog for MemoryCatalog {
    async fn find(&self, name: &str) -> Result<Option<Recipe>, Error> {
        Ok(self.recipes.iter().find(|r| r.name == name).cloned())
    }

    async fn all(&self) -> Result<Vec<Recipe>, Error> {
        Ok(self.recipes.clone())
    }
}
