//! evm - Emacs version manager
//!
//! This is the CLI application: it loads configuration, wires the production
//! collaborators and dispatches each command to the ops crate.

mod cli;
mod display;
mod error;
mod logging;
mod setup;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::logging::init_tracing;
use crate::setup::SystemSetup;
use clap::Parser;
use evm_config::Config;
use evm_ops::{InstallRequest, OperationResult, OpsCtx};
use evm_state::SettingKey;
use evm_types::OutputFormat;
use std::process;
use std::str::FromStr;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic; `Ok(false)` means the command ran but reported problems
async fn run(cli: Cli) -> Result<bool, CliError> {
    // Precedence: file (or defaults), then environment, then CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    let json_mode = config.general.default_output == OutputFormat::Json;
    init_tracing(
        json_mode,
        cli.global.debug,
        config.logs_path().ok().as_deref(),
    );
    info!("Starting evm v{}", env!("CARGO_PKG_VERSION"));

    let renderer = OutputRenderer::new(json_mode, config.general.color);
    let ctx = SystemSetup::new(config, !json_mode).initialize().await?;

    if cli.command.needs_recipes() && evm_ops::ensure_recipes(&ctx).await? && !json_mode {
        eprintln!("Fetched recipes.");
    }

    let result = execute_command(&ctx, cli.command).await?;
    renderer.render_result(&result)?;
    Ok(result.is_success())
}

/// Execute the specified command
async fn execute_command(ctx: &OpsCtx, command: Commands) -> Result<OperationResult, CliError> {
    match command {
        Commands::Install {
            name,
            force,
            use_after,
            skip_installed,
        } => {
            let request = InstallRequest {
                name,
                force,
                use_after,
                skip_installed,
            };
            let report = evm_ops::install(ctx, &request).await?;
            Ok(OperationResult::InstallReport(report))
        }

        Commands::Use { name } => {
            let message = evm_ops::use_package(ctx, &name).await?;
            Ok(OperationResult::Success(message))
        }

        Commands::Disuse => {
            let message = evm_ops::disuse(ctx).await?;
            Ok(OperationResult::Success(message))
        }

        Commands::Uninstall { name } => {
            let report = evm_ops::uninstall(ctx, &name).await?;
            Ok(OperationResult::UninstallReport(report))
        }

        Commands::List => {
            let packages = evm_ops::list_packages(ctx).await?;
            Ok(OperationResult::PackageList(packages))
        }

        Commands::Bin { name } => {
            let path = evm_ops::bin(ctx, name.as_deref()).await?;
            Ok(OperationResult::Binary(path))
        }

        Commands::Config { key, value, unset } => {
            let setting = SettingKey::from_str(&key)?;
            if unset || value.is_some() {
                evm_ops::config_set(ctx, setting, value.as_deref()).await?;
            }
            let value = evm_ops::config_get(ctx, setting).await?;
            Ok(OperationResult::Setting {
                key: setting.to_string(),
                value,
            })
        }

        Commands::Update => {
            let message = evm_ops::update_recipes(ctx).await?;
            Ok(OperationResult::Success(message))
        }

        Commands::Doctor => {
            let report = evm_ops::doctor(ctx).await?;
            Ok(OperationResult::Doctor(report))
        }
    }
}

/// Apply CLI flags on top of file and environment configuration
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
}
