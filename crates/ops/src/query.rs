//! Read-only queries

use crate::OpsCtx;
use evm_errors::{Error, OpsError};
use evm_package::Package;
use evm_types::{DoctorReport, PackageListing};
use std::path::PathBuf;

/// Every catalogued package with its installed/current flags
///
/// # Errors
///
/// Returns an error if the catalog or the settings cannot be read.
pub async fn list_packages(ctx: &OpsCtx) -> Result<Vec<PackageListing>, Error> {
    let current = Package::current(&ctx.package)
        .await?
        .map(|p| p.name().to_string());

    let mut listings = Vec::new();
    for package in Package::all(&ctx.package).await? {
        listings.push(PackageListing {
            installed: package.is_installed().await,
            current: current.as_deref() == Some(package.name()),
            name: package.name().to_string(),
        });
    }
    Ok(listings)
}

/// Binary of the named package, or of the current one
///
/// # Errors
///
/// Returns `NotFound` for unknown names and `NoCurrentPackage` when no name
/// is given and nothing is current.
pub async fn bin(ctx: &OpsCtx, name: Option<&str>) -> Result<PathBuf, Error> {
    let package = match name {
        Some(name) => Package::find(&ctx.package, name).await?,
        None => Package::current(&ctx.package)
            .await?
            .ok_or(OpsError::NoCurrentPackage)?,
    };
    Ok(package.bin().await)
}

/// Read-only reconciliation report
///
/// # Errors
///
/// Returns an error if the settings or the catalog cannot be read.
pub async fn doctor(ctx: &OpsCtx) -> Result<DoctorReport, Error> {
    evm_package::doctor(&ctx.package).await
}
