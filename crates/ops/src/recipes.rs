//! Recipe catalog checkout maintenance

use crate::OpsCtx;
use evm_errors::{Error, OpsError};
use tracing::debug;

/// Pull the recipe checkout, cloning it first if it does not exist
///
/// # Errors
///
/// Returns `RecipesNotConfigured` when a clone is needed but no URL is set,
/// or the git failure.
pub async fn update_recipes(ctx: &OpsCtx) -> Result<String, Error> {
    if ctx.recipes.exists().await {
        ctx.recipes.pull().await?;
        Ok(format!("Updated recipes in {}", ctx.recipes.path().display()))
    } else {
        let url = ctx
            .recipes_url
            .as_deref()
            .ok_or(OpsError::RecipesNotConfigured)?;
        ctx.recipes.clone(url).await?;
        Ok(format!("Cloned recipes from {url}"))
    }
}

/// Clone the recipe checkout on first use when a URL is configured.
///
/// Returns whether a clone happened.
///
/// # Errors
///
/// Returns the git failure.
pub async fn ensure_recipes(ctx: &OpsCtx) -> Result<bool, Error> {
    if ctx.recipes.exists().await {
        return Ok(false);
    }
    match ctx.recipes_url.as_deref() {
        Some(url) => {
            ctx.recipes.clone(url).await?;
            Ok(true)
        }
        None => {
            debug!(path = %ctx.recipes.path().display(), "no recipes checkout and no url configured");
            Ok(false)
        }
    }
}
