//! Report type definitions for operations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What `install` ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallAction {
    /// Built into a fresh installation directory
    Installed,
    /// Removed the previous installation and built again
    Reinstalled,
    /// Already installed and skipping was requested
    Skipped,
}

/// Installation report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstallReport {
    /// Package name
    pub package: String,
    /// What happened
    pub action: InstallAction,
    /// Resolved binary of the package
    pub binary: PathBuf,
    /// Whether the package was activated afterwards
    pub activated: bool,
    /// Total execution time
    pub duration_ms: u64,
}

/// Uninstall report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UninstallReport {
    /// Package name
    pub package: String,
    /// Whether the package was the recorded current one
    pub was_current: bool,
}

/// One row of `evm list`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageListing {
    pub name: String,
    pub installed: bool,
    pub current: bool,
}

/// Inconsistency between shims, the recorded current package and installs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A package is recorded as current but the managed shim is absent
    ManagedShimMissing,
    /// The managed shim forwards somewhere other than the current package
    ManagedShimStale,
    /// The primary shim was not written by evm
    PrimaryShimForeign,
    /// The primary shim forwards to a package other than the current one
    PrimaryShimStale,
    /// The recorded current package is not installed
    CurrentNotInstalled,
    /// The recorded current package is not in the recipe catalog
    CurrentUnknown,
    /// Shims exist while no package is recorded as current
    OrphanedShim,
}

/// A single reconciliation finding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Path or package the finding is about
    pub subject: String,
    pub detail: String,
}

/// Result of the read-only reconciliation pass
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DoctorReport {
    /// Name recorded as current, if any
    pub current: Option<String>,
    pub findings: Vec<Finding>,
}

impl DoctorReport {
    /// True when nothing is out of sync
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.findings.is_empty()
    }
}
