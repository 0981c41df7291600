//! Read-only consistency check between shims, `current` and installations

use crate::context::PackageCtx;
use crate::package::Package;
use crate::shim::ShimState;
use evm_errors::Error;
use evm_state::SettingKey;
use evm_types::{DoctorReport, Finding, FindingKind};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Compare the shims with the recorded `current` package. Modifies nothing.
///
/// # Errors
///
/// Returns an error only if the settings store or the catalog cannot be read.
pub async fn doctor(ctx: &Arc<PackageCtx>) -> Result<DoctorReport, Error> {
    let current = ctx.settings.get(SettingKey::Current).await?;
    let managed = ctx.shims.inspect(&ctx.layout.managed_shim).await;
    let primary = ctx.shims.inspect(&ctx.layout.primary_shim).await;
    let mut findings = Vec::new();

    match &current {
        Some(name) => match Package::find(ctx, name).await {
            Ok(package) => check_active(&package, &managed, &primary, ctx, &mut findings).await,
            Err(e) if e.is_package_not_found() => findings.push(finding(
                FindingKind::CurrentUnknown,
                name,
                "recorded as current but not in the recipe catalog",
            )),
            Err(e) => return Err(e),
        },
        None => {
            for (path, state) in [
                (&ctx.layout.managed_shim, &managed),
                (&ctx.layout.primary_shim, &primary),
            ] {
                match state {
                    ShimState::Forwarding(target) => findings.push(finding(
                        FindingKind::OrphanedShim,
                        &path.display().to_string(),
                        &format!("forwards to {} but no package is current", target.display()),
                    )),
                    ShimState::Foreign if path == &ctx.layout.managed_shim => {
                        findings.push(finding(
                            FindingKind::OrphanedShim,
                            &path.display().to_string(),
                            "unrecognised file at the managed shim location",
                        ));
                    }
                    ShimState::Foreign => findings.push(foreign_primary(path)),
                    ShimState::Absent => {}
                }
            }
        }
    }

    for f in &findings {
        warn!(kind = ?f.kind, subject = %f.subject, "{}", f.detail);
    }

    Ok(DoctorReport { current, findings })
}

async fn check_active(
    package: &Package,
    managed: &ShimState,
    primary: &ShimState,
    ctx: &PackageCtx,
    findings: &mut Vec<Finding>,
) {
    let bin = package.bin().await;
    if !package.is_installed().await {
        findings.push(finding(
            FindingKind::CurrentNotInstalled,
            package.name(),
            &format!("{} is not an executable file", bin.display()),
        ));
    }

    let managed_path = ctx.layout.managed_shim.display().to_string();
    match managed {
        ShimState::Absent => findings.push(finding(
            FindingKind::ManagedShimMissing,
            &managed_path,
            &format!("{} is current but the managed shim is missing", package.name()),
        )),
        ShimState::Forwarding(target) if target == &bin => {}
        ShimState::Forwarding(target) => findings.push(finding(
            FindingKind::ManagedShimStale,
            &managed_path,
            &format!("forwards to {} instead of {}", target.display(), bin.display()),
        )),
        ShimState::Foreign => findings.push(finding(
            FindingKind::ManagedShimStale,
            &managed_path,
            "unrecognised file at the managed shim location",
        )),
    }

    match primary {
        ShimState::Forwarding(target) if target != &bin => findings.push(finding(
            FindingKind::PrimaryShimStale,
            &ctx.layout.primary_shim.display().to_string(),
            &format!("forwards to {} instead of {}", target.display(), bin.display()),
        )),
        ShimState::Foreign => findings.push(foreign_primary(&ctx.layout.primary_shim)),
        ShimState::Absent | ShimState::Forwarding(_) => {}
    }
}

fn foreign_primary(path: &Path) -> Finding {
    finding(
        FindingKind::PrimaryShimForeign,
        &path.display().to_string(),
        "not written by evm; left untouched",
    )
}

fn finding(kind: FindingKind, subject: &str, detail: &str) -> Finding {
    Finding {
        kind,
        subject: subject.to_string(),
        detail: detail.to_string(),
    }
}
