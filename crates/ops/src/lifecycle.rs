//! install / use / disuse / uninstall

use crate::{InstallRequest, OpsCtx};
use evm_errors::{Error, OpsError};
use evm_package::Package;
use evm_types::{InstallAction, InstallReport, UninstallReport};
use std::time::Instant;
use tracing::{info, warn};

/// Build and install a package.
///
/// An installed package is an error unless `force` (reinstall) or
/// `skip_installed` (no-op) is set. With `use_after` the package is activated
/// afterwards, including when it was skipped.
///
/// # Errors
///
/// Returns `NotFound` for unknown names, `AlreadyInstalled`, or the first
/// lifecycle failure.
pub async fn install(ctx: &OpsCtx, request: &InstallRequest) -> Result<InstallReport, Error> {
    let start = Instant::now();
    let package = Package::find(&ctx.package, &request.name).await?;

    let action = if package.is_installed().await {
        if request.skip_installed {
            info!(package = %package, "already installed, skipping");
            InstallAction::Skipped
        } else if request.force {
            info!(package = %package, "reinstalling");
            package.uninstall().await?;
            package.install().await?;
            InstallAction::Reinstalled
        } else {
            return Err(OpsError::AlreadyInstalled {
                package: request.name.clone(),
            }
            .into());
        }
    } else {
        package.install().await?;
        InstallAction::Installed
    };

    if request.use_after {
        package.activate().await?;
    }

    Ok(InstallReport {
        package: package.name().to_string(),
        action,
        binary: package.bin().await,
        activated: request.use_after,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

/// Activate an installed package
///
/// # Errors
///
/// Returns `NotFound`, `NotInstalled`, or the first activation failure.
pub async fn use_package(ctx: &OpsCtx, name: &str) -> Result<String, Error> {
    let package = Package::find(&ctx.package, name).await?;
    if !package.is_installed().await {
        return Err(OpsError::NotInstalled {
            package: name.to_string(),
        }
        .into());
    }
    package.activate().await?;
    Ok(format!("Using {package}"))
}

/// Deactivate whatever is current
///
/// # Errors
///
/// Returns the first shim or settings failure.
pub async fn disuse(ctx: &OpsCtx) -> Result<String, Error> {
    evm_package::deactivate(&ctx.package).await?;
    Ok("No package in use".to_string())
}

/// Remove an installed package.
///
/// Removing the current package deletes the managed shim but leaves
/// `current` pointing at the removed name until `disuse` is run.
///
/// # Errors
///
/// Returns `NotFound`, `NotInstalled`, or the first removal failure.
pub async fn uninstall(ctx: &OpsCtx, name: &str) -> Result<UninstallReport, Error> {
    let package = Package::find(&ctx.package, name).await?;
    if !package.is_installed().await {
        return Err(OpsError::NotInstalled {
            package: name.to_string(),
        }
        .into());
    }

    let was_current = package.is_current().await?;
    package.uninstall().await?;
    if was_current {
        warn!(
            package = %package,
            "removed the package in use; `current` still names it, run `evm disuse` to clear it"
        );
    }

    Ok(UninstallReport {
        package: package.name().to_string(),
        was_current,
    })
}
