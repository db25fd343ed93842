use crate::detect::RuntimeKind;
use crate::error::RunError;
use crate::path::{escape_for_mingw, to_runtime_path};
use crate::platform::HostContext;
use crate::sanitize::{quote, wrap_tokens};
use crate::spec::{Entrypoint, MountKind, RunSpec};
use std::fmt;
use tracing::debug;

/// Ordered command-line tokens for one runtime invocation.
///
/// Tokens are already quoted for the host shell; [`CompiledInvocation::command_line`]
/// is the only place they become a single string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInvocation {
    runtime: RuntimeKind,
    tokens: Vec<String>,
}

impl CompiledInvocation {
    pub fn runtime(&self) -> RuntimeKind {
        self.runtime
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn command_line(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for CompiledInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Compile `spec` into a `run` invocation for an already detected runtime.
///
/// Flag order is fixed: name, entrypoint, env, ports, capabilities, workdir,
/// mounts, user args, image, command. Snapshot tests downstream depend on it.
pub fn compile(
    spec: &RunSpec,
    runtime: RuntimeKind,
    host: &HostContext,
) -> Result<CompiledInvocation, RunError> {
    let binary = runtime.binary().ok_or(RunError::NoRuntimeFound)?;
    spec.validate()?;

    let platform = &host.platform;
    let mut tokens: Vec<String> = Vec::new();

    // podman under mintty needs a real console to allocate its tty
    if runtime == RuntimeKind::Podman && platform.is_cygwin_tty {
        tokens.push("winpty".to_string());
    }

    tokens.push(binary.to_string());
    tokens.push("run".to_string());
    tokens.push("--rm".to_string());

    if host.interactive() {
        tokens.push("-ti".to_string());
    }

    if let Some(name) = spec.name.as_deref().filter(|name| !name.is_empty()) {
        tokens.push("--name".to_string());
        tokens.push(quote(name, platform));
    }

    if let Entrypoint::Override(entrypoint) = &spec.entrypoint {
        tokens.push("--entrypoint".to_string());
        tokens.push(quote(entrypoint, platform));
    }

    for var in &spec.environment {
        tokens.push("-e".to_string());
        tokens.push(format!("{}={}", var.name, quote(&var.value, platform)));
    }

    for port in &spec.ports {
        tokens.push("-p".to_string());
        tokens.push(port.to_string());
    }

    for capability in &spec.capabilities {
        tokens.push("--cap-add".to_string());
        tokens.push(quote(capability, platform));
    }

    if !spec.working_directory.is_empty() {
        let workdir = if platform.is_mingw {
            escape_for_mingw(&spec.working_directory)
        } else {
            spec.working_directory.clone()
        };
        tokens.push("--workdir".to_string());
        tokens.push(quote(&workdir, platform));
    }

    for mount in &spec.mounts {
        match mount.kind {
            MountKind::Directory => {
                let source = to_runtime_path(&mount.source, runtime, platform);
                tokens.push("-v".to_string());
                tokens.push(quote(&format!("{}:{}", source, mount.target), platform));
            }
        }
    }

    let user_args = spec.user_args.trim();
    if !user_args.is_empty() {
        tokens.push(user_args.to_string());
    }

    tokens.push(spec.image.clone());
    tokens.extend(wrap_tokens(spec.shell, &spec.command, platform));

    let invocation = finish(runtime, tokens, host);
    debug!(command = %invocation, "compiled container invocation");
    Ok(invocation)
}

/// Compile `<runtime> pull <image>`.
pub fn compile_pull(
    image: &str,
    runtime: RuntimeKind,
    host: &HostContext,
) -> Result<CompiledInvocation, RunError> {
    let binary = runtime.binary().ok_or(RunError::NoRuntimeFound)?;
    if image.trim().is_empty() {
        return Err(RunError::InvalidSpec {
            message: "image must not be empty".to_string(),
        });
    }

    let tokens = vec![binary.to_string(), "pull".to_string(), image.to_string()];
    Ok(finish(runtime, tokens, host))
}

/// Toolbox's daemon lives in a VM that is only reachable over `docker-machine ssh`.
fn finish(runtime: RuntimeKind, mut tokens: Vec<String>, host: &HostContext) -> CompiledInvocation {
    if runtime == RuntimeKind::DockerToolbox {
        let mut prefixed = vec![
            "docker-machine".to_string(),
            "ssh".to_string(),
            host.machine_name.clone(),
        ];
        prefixed.append(&mut tokens);
        tokens = prefixed;
    }
    CompiledInvocation { runtime, tokens }
}
