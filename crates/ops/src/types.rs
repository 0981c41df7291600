//! Request and result types

use evm_errors::{Error, OpsError};
use evm_types::{DoctorReport, InstallReport, PackageListing, UninstallReport};
use serde::Serialize;
use std::path::PathBuf;

/// Parameters of `install`
#[derive(Clone, Debug, Default)]
pub struct InstallRequest {
    pub name: String,
    /// Uninstall first if already installed
    pub force: bool,
    /// Activate once installed
    pub use_after: bool,
    /// Treat an existing installation as success
    pub skip_installed: bool,
}

impl InstallRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Every catalogued package with its flags
    PackageList(Vec<PackageListing>),
    /// Installation report
    InstallReport(InstallReport),
    /// Uninstall report
    UninstallReport(UninstallReport),
    /// Resolved binary path
    Binary(PathBuf),
    /// A persisted setting
    Setting { key: String, value: Option<String> },
    /// Reconciliation findings
    Doctor(DoctorReport),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            OpsError::InitializationFailed {
                message: format!("failed to serialize result: {e}"),
            }
            .into()
        })
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Doctor(report) => report.is_healthy(),
            Self::PackageList(_)
            | Self::InstallReport(_)
            | Self::UninstallReport(_)
            | Self::Binary(_)
            | Self::Setting { .. }
            | Self::Success(_) => true,
        }
    }
}
