#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for evm
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/evm/config.toml)
//! - Environment variables
//! - CLI flags
//!
//! The persisted `current`/`path` record lives in `evm-state`, not here.

pub mod constants;

pub use constants as fixed_paths;

use evm_errors::{ConfigError, Error};
use evm_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub recipes: RecipesConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// evm home (default `~/.evm`)
    pub home: Option<PathBuf>,
    /// Base directory holding one directory per installed package
    pub installations: Option<PathBuf>,
    /// Recipe catalog checkout
    pub recipes: Option<PathBuf>,
    /// Conventional, possibly user-owned, shim location
    pub primary_shim: Option<PathBuf>,
    /// Tool-owned shim location
    pub managed_shim: Option<PathBuf>,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_jobs")]
    pub jobs: usize, // 0 = auto-detect
}

/// Recipe catalog source
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecipesConfig {
    /// Git URL the recipe catalog is cloned from
    pub url: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: 0, // 0 = auto-detect
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_build_jobs() -> usize {
    0 // 0 = auto-detect
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("evm").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config file");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // EVM_HOME
        if let Ok(home) = std::env::var("EVM_HOME") {
            if home.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "EVM_HOME".to_string(),
                    value: home,
                }
                .into());
            }
            self.paths.home = Some(PathBuf::from(home));
        }

        // EVM_OUTPUT
        if let Ok(output) = std::env::var("EVM_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "EVM_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // EVM_COLOR
        if let Ok(color) = std::env::var("EVM_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "EVM_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // EVM_BUILD_JOBS
        if let Ok(jobs) = std::env::var("EVM_BUILD_JOBS") {
            self.build.jobs = jobs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "EVM_BUILD_JOBS".to_string(),
                value: jobs,
            })?;
        }

        // EVM_RECIPES_URL
        if let Ok(url) = std::env::var("EVM_RECIPES_URL") {
            self.recipes.url = Some(url);
        }

        Ok(())
    }

    /// Get the evm home directory (default `~/.evm`)
    ///
    /// # Errors
    ///
    /// Returns an error if no home is configured and the user's home
    /// directory cannot be determined.
    pub fn home_path(&self) -> Result<PathBuf, Error> {
        if let Some(home) = &self.paths.home {
            return Ok(home.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(fixed_paths::HOME_DIR))
            .ok_or_else(|| ConfigError::NoHomeDir.into())
    }

    /// Get the installation base path (with default)
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn installations_path(&self) -> Result<PathBuf, Error> {
        match &self.paths.installations {
            Some(path) => Ok(path.clone()),
            None => Ok(self.home_path()?.join(fixed_paths::INSTALLATIONS_DIR)),
        }
    }

    /// Get the recipe catalog path (with default)
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn recipes_path(&self) -> Result<PathBuf, Error> {
        match &self.paths.recipes {
            Some(path) => Ok(path.clone()),
            None => Ok(self.home_path()?.join(fixed_paths::RECIPES_DIR)),
        }
    }

    /// Get the primary shim path (default `~/.evm/bin/emacs`)
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn primary_shim_path(&self) -> Result<PathBuf, Error> {
        match &self.paths.primary_shim {
            Some(path) => Ok(path.clone()),
            None => Ok(self
                .home_path()?
                .join(fixed_paths::BIN_DIR)
                .join(fixed_paths::APP_BINARY)),
        }
    }

    /// Get the managed shim path (default `~/.evm/bin/evm-emacs`)
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn managed_shim_path(&self) -> Result<PathBuf, Error> {
        match &self.paths.managed_shim {
            Some(path) => Ok(path.clone()),
            None => Ok(self
                .home_path()?
                .join(fixed_paths::BIN_DIR)
                .join(fixed_paths::MANAGED_SHIM)),
        }
    }

    /// Get the persisted settings file path
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn settings_path(&self) -> Result<PathBuf, Error> {
        Ok(self.home_path()?.join(fixed_paths::SETTINGS_FILE))
    }

    /// Get the debug log directory
    ///
    /// # Errors
    ///
    /// Returns an error if the evm home cannot be determined.
    pub fn logs_path(&self) -> Result<PathBuf, Error> {
        Ok(self.home_path()?.join(fixed_paths::LOGS_DIR))
    }
}

/// Calculate build jobs based on CPU count
#[must_use]
pub fn calculate_build_jobs(config_value: usize) -> usize {
    if config_value > 0 {
        config_value // User override
    } else {
        let cpus = num_cpus::get();

        // Use 75% of CPUs for builds, minimum 1
        (cpus * 3 / 4).max(1)
    }
}
