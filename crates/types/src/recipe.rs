//! YAML recipe format
//!
//! A recipe names one installable Emacs version and describes how to fetch
//! and build it on each supported platform:
//!
//! ```yaml
//! name: emacs-29.4
//! source:
//!   tar_gz: https://ftpmirror.gnu.org/emacs/emacs-29.4.tar.gz
//! linux:
//!   options: ["--prefix={install}", "--without-x"]
//!   steps:
//!     - configure
//!     - make: bootstrap
//!     - make: install
//! macos:
//!   options: ["--with-ns"]
//!   steps:
//!     - configure
//!     - make: install
//!     - copy: { from: "{build}/nextstep/Emacs.app", to: "{install}" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder replaced by the package's installation directory
pub const INSTALL_PLACEHOLDER: &str = "{install}";
/// Placeholder replaced by the package's build directory
pub const BUILD_PLACEHOLDER: &str = "{build}";
/// Scratch directory shared by all builds, beside the installations
pub const SCRATCH_DIR: &str = "tmp";

/// Complete recipe for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Package name, unique within the catalog
    pub name: String,

    /// Where the sources come from
    pub source: Source,

    /// Build instructions used on Linux (and any non-macOS host)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<PlatformBuild>,

    /// Build instructions used on macOS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macos: Option<PlatformBuild>,
}

/// Source acquisition methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Git {
        git: String,
        #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
    TarGz {
        tar_gz: String,
    },
    TarXz {
        tar_xz: String,
    },
    TarBz2 {
        tar_bz2: String,
    },
}

impl Source {
    /// Archive URL and file extension, or `None` for git sources
    #[must_use]
    pub fn archive(&self) -> Option<(&str, &'static str)> {
        match self {
            Self::Git { .. } => None,
            Self::TarGz { tar_gz } => Some((tar_gz, "tar.gz")),
            Self::TarXz { tar_xz } => Some((tar_xz, "tar.xz")),
            Self::TarBz2 { tar_bz2 } => Some((tar_bz2, "tar.bz2")),
        }
    }

    /// The URL sources are fetched from
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Git { git, .. } => git,
            Self::TarGz { tar_gz: url }
            | Self::TarXz { tar_xz: url }
            | Self::TarBz2 { tar_bz2: url } => url,
        }
    }
}

/// Platform-specific build section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBuild {
    /// Arguments passed to `./configure`
    #[serde(default)]
    pub options: Vec<String>,

    /// Steps run in order inside the build directory
    #[serde(default = "default_steps")]
    pub steps: Vec<BuildStep>,
}

impl Default for PlatformBuild {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            steps: default_steps(),
        }
    }
}

fn default_steps() -> Vec<BuildStep> {
    vec![BuildStep::Configure, BuildStep::Make("install".to_string())]
}

/// A single build step.
///
/// Written as a bare word (`autogen`, `configure`) or a one-key map
/// (`make: install`, `copy: { from, to }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub enum BuildStep {
    /// `./autogen.sh`
    Autogen,
    /// `./configure <options>`
    Configure,
    /// `make <target>`
    Make(String),
    /// `cp -R <from> <to>`
    Copy { from: String, to: String },
}

/// On-disk shape of a [`BuildStep`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawStep {
    Bare(String),
    Make(MakeStep),
    Copy(CopyStep),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MakeStep {
    make: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CopyStep {
    copy: CopyPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CopyPaths {
    from: String,
    to: String,
}

impl TryFrom<RawStep> for BuildStep {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        match raw {
            RawStep::Bare(word) => match word.as_str() {
                "autogen" => Ok(Self::Autogen),
                "configure" => Ok(Self::Configure),
                other => Err(format!(
                    "unknown build step `{other}`, expected autogen, configure, make or copy"
                )),
            },
            RawStep::Make(MakeStep { make }) => Ok(Self::Make(make)),
            RawStep::Copy(CopyStep {
                copy: CopyPaths { from, to },
            }) => Ok(Self::Copy { from, to }),
        }
    }
}

impl From<BuildStep> for RawStep {
    fn from(step: BuildStep) -> Self {
        match step {
            BuildStep::Autogen => Self::Bare("autogen".to_string()),
            BuildStep::Configure => Self::Bare("configure".to_string()),
            BuildStep::Make(make) => Self::Make(MakeStep { make }),
            BuildStep::Copy { from, to } => Self::Copy(CopyStep {
                copy: CopyPaths { from, to },
            }),
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Autogen => write!(f, "autogen"),
            Self::Configure => write!(f, "configure"),
            Self::Make(target) => write!(f, "make {target}"),
            Self::Copy { from, to } => write!(f, "copy {from} {to}"),
        }
    }
}

impl Recipe {
    /// Create a recipe with no platform sections
    #[must_use]
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            source,
            linux: None,
            macos: None,
        }
    }

    /// Parse a recipe from YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid recipe.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }

    /// Build section for the host: `macos` on macOS, `linux` everywhere else
    #[must_use]
    pub fn build_for(&self, is_macos: bool) -> Option<&PlatformBuild> {
        if is_macos {
            self.macos.as_ref()
        } else {
            self.linux.as_ref()
        }
    }
}

/// Check that `name` is usable as one directory under the installation base.
///
/// # Errors
///
/// Returns the reason the name is rejected.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name == "." || name == ".." {
        return Err("name must not be a relative directory");
    }
    if name == SCRATCH_DIR {
        return Err("name is reserved for the build scratch directory");
    }
    if name.contains(['/', '\\', '\0']) {
        return Err("name must not contain path separators");
    }
    Ok(())
}

/// Substitute `{install}` and `{build}` in a recipe value
#[must_use]
pub fn expand(template: &str, install: &Path, build: &Path) -> String {
    template
        .replace(INSTALL_PLACEHOLDER, &install.display().to_string())
        .replace(BUILD_PLACEHOLDER, &build.display().to_string())
}
