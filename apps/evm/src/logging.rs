//! Tracing subscriber setup

use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,evm=warn";
const DEBUG_FILTER: &str =
    "info,evm=debug,evm_ops=debug,evm_package=debug,evm_builder=debug,evm_index=debug";

/// Initialize tracing.
///
/// `--debug` (or `RUST_LOG`) writes JSON logs to `<log_dir>/evm-<timestamp>.log`.
/// In JSON output mode nothing is logged to the console so stdout/stderr stay
/// machine readable.
pub fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: Option<&Path>) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        if let Some(file) = log_dir.and_then(create_log_file) {
            let (file, path) = file;
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEBUG_FILTER)),
                )
                .init();
            if !json_mode {
                eprintln!("Debug logging enabled: {}", path.display());
            }
            return;
        }
    }

    if json_mode {
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
            )
            .init();
    }
}

fn create_log_file(log_dir: &Path) -> Option<(std::fs::File, std::path::PathBuf)> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let path = log_dir.join(format!(
        "evm-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&path) {
        Ok(file) => Some((file, path)),
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}
