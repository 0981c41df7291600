#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Recipe catalog for evm
//!
//! This crate resolves package names to build recipes. The production
//! catalog reads one YAML recipe per file from the recipes directory, which
//! is itself a shallow git checkout maintained by [`git::RecipeRepository`].

mod directory;
pub mod git;
mod memory;

pub use directory::DirectoryCatalog;
pub use git::RecipeRepository;
pub use memory::MemoryCatalog;

use async_trait::async_trait;
use evm_errors::Error;
use evm_types::Recipe;

/// Lookup of package names and their build recipes
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Recipe named exactly `name`, if catalogued
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog itself cannot be read.
    async fn find(&self, name: &str) -> Result<Option<Recipe>, Error>;

    /// Every recipe, in catalog order
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog itself cannot be read.
    async fn all(&self) -> Result<Vec<Recipe>, Error>;
}
