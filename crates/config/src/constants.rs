//! Fixed names for the managed application and the evm home layout
//!
//! These are deliberately not exposed via TOML configuration: the shim
//! format and the binary resolution rules depend on them.

/// Binary name under `<install>/bin`
pub const APP_BINARY: &str = "emacs";
/// macOS application bundle directory under the install root
pub const APP_BUNDLE: &str = "Emacs.app";
/// Binary name inside `Emacs.app/Contents/MacOS`
pub const BUNDLE_BINARY: &str = "Emacs";

/// Name of the tool-owned shim
pub const MANAGED_SHIM: &str = "evm-emacs";

pub const HOME_DIR: &str = ".evm";
pub const BIN_DIR: &str = "bin";
pub const INSTALLATIONS_DIR: &str = "installations";
pub const RECIPES_DIR: &str = "recipes";
pub const LOGS_DIR: &str = "logs";
pub const SETTINGS_FILE: &str = "config.json";

/// Shared build scratch directory under the installation base
pub const TMP_DIR: &str = evm_types::SCRATCH_DIR;
