//! Command line interface definition

use clap::{Parser, Subcommand};
use evm_types::ColorChoice;
use std::path::PathBuf;

/// evm - Emacs version manager
#[derive(Parser)]
#[command(name = "evm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install, build and switch between Emacs versions")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to ~/.evm/logs/
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build and install a package
    #[command(alias = "i")]
    Install {
        /// Package name, as listed by `evm list`
        name: String,

        /// Reinstall if already installed
        #[arg(short, long)]
        force: bool,

        /// Use the package once installed
        #[arg(short, long = "use")]
        use_after: bool,

        /// Do nothing if already installed
        #[arg(short, long = "skip", conflicts_with = "force")]
        skip_installed: bool,
    },

    /// Make an installed package the active one
    Use {
        /// Package name
        name: String,
    },

    /// Deactivate the active package and remove its shims
    Disuse,

    /// Remove an installed package
    #[command(alias = "rm")]
    Uninstall {
        /// Package name
        name: String,
    },

    /// List available packages
    #[command(alias = "ls")]
    List,

    /// Print the Emacs binary of a package (default: the active one)
    Bin {
        /// Package name
        name: Option<String>,
    },

    /// Get or set a persisted setting (`current`, `path`)
    Config {
        /// Setting name
        key: String,

        /// New value; omit to print the current one
        value: Option<String>,

        /// Clear the setting
        #[arg(long, conflicts_with = "value")]
        unset: bool,
    },

    /// Fetch the latest recipes
    #[command(alias = "up")]
    Update,

    /// Check shims and the active package for inconsistencies
    Doctor,
}

impl Commands {
    /// Whether the command reads the recipe catalog
    pub fn needs_recipes(&self) -> bool {
        !matches!(
            self,
            Commands::Update | Commands::Config { .. } | Commands::Disuse
        )
    }
}
