//! Host process operations implementation
//!
//! Runs commands with `tokio::process`, logging each invocation and mapping
//! spawn failures to `PlatformError`.

use async_trait::async_trait;
use evm_errors::{Error, PlatformError};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Host implementation of process operations
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessOperations;

impl HostProcessOperations {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessOperations for HostProcessOperations {
    async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let command_line = cmd.display();
        debug!(command = %command_line, cwd = ?cmd.get_current_dir(), "executing command");

        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args());

        if let Some(dir) = cmd.get_current_dir() {
            command.current_dir(dir);
        }

        for (key, value) in cmd.get_env_vars() {
            command.env(key, value);
        }

        let result = if cmd.inherits_output() {
            command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map(|status| CommandOutput {
                    status,
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                })
        } else {
            command.output().await.map(|output| CommandOutput {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        };

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(output) => {
                debug!(
                    command = %command_line,
                    exit_code = ?output.status.code(),
                    duration_ms,
                    "command finished"
                );
                Ok(output)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(command = %command_line, "command not found");
                Err(PlatformError::CommandNotFound {
                    command: cmd.program().to_string(),
                }
                .into())
            }
            Err(e) => Err(PlatformError::ProcessExecutionFailed {
                command: cmd.program().to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}
