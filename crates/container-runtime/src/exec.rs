use crate::compile::CompiledInvocation;
use crate::error::RunError;
use crate::platform::{HostOs, HostPlatform};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, error};

/// Host shell around a full command line: `/usr/bin/env sh -c` or `powershell`.
pub fn host_shell_command(command_line: &str, platform: &HostPlatform) -> Command {
    let mut command = match platform.os {
        HostOs::Windows => Command::new("powershell"),
        HostOs::Linux | HostOs::Darwin => {
            let mut command = Command::new("/usr/bin/env");
            command.arg("sh").arg("-c");
            command
        }
    };
    command.arg(command_line);
    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

/// Run the invocation in the foreground and wait for it.
///
/// Blocks the calling thread for the lifetime of the container; there is no
/// timeout. A non-zero exit is reported as [`RunError::ExecutionFailed`].
pub fn run(invocation: &CompiledInvocation, platform: &HostPlatform) -> Result<ExitStatus, RunError> {
    run_command_line(&invocation.command_line(), platform)
}

pub fn run_command_line(command_line: &str, platform: &HostPlatform) -> Result<ExitStatus, RunError> {
    let mut command = host_shell_command(command_line, platform);
    debug!(
        program = %command.get_program().to_string_lossy(),
        command = command_line,
        "spawning host shell"
    );

    let status = command.status().map_err(|err| {
        error!(error = %err, command = command_line, "failed to start host shell");
        RunError::spawn(command_line, err)
    })?;

    if !status.success() {
        error!(code = ?status.code(), command = command_line, "command failed");
        return Err(RunError::exited(command_line, status.code()));
    }
    Ok(status)
}
