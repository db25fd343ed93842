//! Turns a run entry plus CLI flags into the `RunSpec` handed to the compiler.

use crate::entry::RunEntry;
use crate::passthrough::host_environment;
use anyhow::{anyhow, Context, Result};
use container_runtime::{
    escape_args, to_runtime_path, EnvVar, HostContext, Mount, PortMapping, RunSpec, RuntimeKind,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const RUNTIME_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl ProxySettings {
    fn http(&self) -> &str {
        self.http.as_deref().unwrap_or_default()
    }

    fn https(&self) -> &str {
        self.https.as_deref().unwrap_or_default()
    }
}

/// Everything `envctl run` collected before a runtime was chosen.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub entry: RunEntry,
    /// The command followed by its arguments, unescaped.
    pub args: Vec<String>,
    pub env: Vec<String>,
    pub ports: Vec<String>,
    pub user_args: Vec<String>,
    pub name: Option<String>,
    pub project_dir: PathBuf,
    pub current_dir: PathBuf,
    pub cache_path: Option<PathBuf>,
    pub proxy: ProxySettings,
}

pub fn build_run_spec<I>(
    request: &RunRequest,
    runtime: RuntimeKind,
    host: &HostContext,
    host_env: I,
) -> Result<RunSpec>
where
    I: IntoIterator<Item = (String, String)>,
{
    let entry = &request.entry;
    let mut spec = RunSpec::new(entry.image.clone());
    spec.entrypoint = entry.entrypoint.clone();
    spec.shell = entry.shell;
    spec.name = request.name.clone().filter(|name| !name.is_empty());

    let project_source = request.project_dir.to_string_lossy().to_string();
    debug!(source = %project_source, target = %entry.directory, "adding project mount");
    spec.add_mount(Mount::directory(project_source, entry.directory.clone()));
    spec.working_directory = working_directory(
        &entry.directory,
        &request.project_dir,
        &request.current_dir,
    )?;

    for port in &request.ports {
        spec.ports.push(port.parse::<PortMapping>()?);
    }
    for env in &request.env {
        spec.environment.push(env.parse::<EnvVar>()?);
    }

    let joined_user_args = request.user_args.join(" ");
    spec.user_args = joined_user_args.trim().to_string();

    spec.command = command_with_before_script(
        &escape_args(&request.args, &host.platform),
        &entry.before_script,
        &request.proxy,
    );
    debug!(command = %spec.command, "resolved container command");

    if entry.container_runtime_access {
        spec.add_mount(Mount::directory(
            runtime_socket_source(runtime, host),
            RUNTIME_SOCKET,
        ));
    }

    add_cache_mounts(&mut spec, request, runtime, host)?;

    spec.capabilities.extend(entry.cap_add.iter().cloned());

    if host.ci {
        spec.environment.extend(host_environment(host_env));
    }

    if !request.proxy.http().is_empty() {
        spec.add_env("http_proxy", request.proxy.http());
    }
    if !request.proxy.https().is_empty() {
        spec.add_env("https_proxy", request.proxy.https());
    }

    Ok(spec)
}

/// Container directory that mirrors the caller's position inside the project.
pub fn working_directory(directory: &str, project_dir: &Path, current_dir: &Path) -> Result<String> {
    let relative = current_dir.strip_prefix(project_dir).map_err(|_| {
        anyhow!(
            "Current directory '{}' is outside the project directory '{}'",
            current_dir.display(),
            project_dir.display()
        )
    })?;
    let relative = relative.to_string_lossy().replace('\\', "/");
    let relative = relative.trim_matches('/');

    if relative.is_empty() {
        Ok(directory.to_string())
    } else {
        Ok(format!("{}/{}", directory.trim_end_matches('/'), relative))
    }
}

/// `before_script` steps run first; proxy placeholders are filled in afterwards.
pub fn command_with_before_script(
    command: &str,
    before_script: &[String],
    proxy: &ProxySettings,
) -> String {
    let command = command.trim();
    if before_script.is_empty() {
        return command.to_string();
    }

    format!("{} && {}", before_script.join(";"), command)
        .replace("{HTTPProxy}", proxy.http())
        .replace("{HTTPSProxy}", proxy.https())
}

/// Docker Desktop on Windows needs the socket escaped with a leading `/`.
fn runtime_socket_source(runtime: RuntimeKind, host: &HostContext) -> String {
    if host.platform.is_windows() && runtime == RuntimeKind::DockerNative {
        format!("/{}", RUNTIME_SOCKET)
    } else {
        RUNTIME_SOCKET.to_string()
    }
}

fn add_cache_mounts(
    spec: &mut RunSpec,
    request: &RunRequest,
    runtime: RuntimeKind,
    host: &HostContext,
) -> Result<()> {
    if request.entry.caching.is_empty() {
        return Ok(());
    }
    let Some(cache_root) = &request.cache_path else {
        warn!("Cache is disabled, no cache path configured");
        return Ok(());
    };

    let platform = host.platform.with_mingw(false);
    for cache in &request.entry.caching {
        let folder = cache_root.join(&cache.name);
        fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create cache directory '{}'", folder.display()))?;

        let source = folder.to_string_lossy().to_string();
        let visible_source = to_runtime_path(&source, runtime, &platform);
        spec.add_mount(Mount::directory(source, cache.container_directory.clone()));
        spec.add_env(format!("cache_{}_source", cache.name), visible_source);
        spec.add_env(
            format!("cache_{}_target", cache.name),
            cache.container_directory.clone(),
        );
    }
    Ok(())
}
