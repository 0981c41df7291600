//! Mapping of recipe steps to commands

use evm_platform::PlatformCommand;
use evm_types::{expand, BuildStep};
use std::path::Path;

/// Command for one step, to be run inside `build_dir`
#[must_use]
pub fn step_command(
    step: &BuildStep,
    options: &[String],
    install: &Path,
    build_dir: &Path,
    jobs: usize,
) -> PlatformCommand {
    let mut cmd = match step {
        BuildStep::Autogen => PlatformCommand::new("./autogen.sh"),
        BuildStep::Configure => {
            let mut cmd = PlatformCommand::new("./configure");
            cmd.args(options.iter().map(|opt| expand(opt, install, build_dir)));
            cmd
        }
        BuildStep::Make(target) => {
            let mut cmd = PlatformCommand::new("make");
            if jobs > 1 {
                cmd.arg(format!("-j{jobs}"));
            }
            cmd.arg(expand(target, install, build_dir));
            cmd
        }
        BuildStep::Copy { from, to } => {
            let mut cmd = PlatformCommand::new("cp");
            cmd.arg("-R")
                .arg(expand(from, install, build_dir))
                .arg(expand(to, install, build_dir));
            cmd
        }
    };
    cmd.current_dir(build_dir);
    cmd
}
