use super::{EntrySource, GlobalArgs};
use crate::assemble::{build_run_spec, ProxySettings, RunRequest};
use anyhow::{Context, Result};
use clap::Args;
use container_runtime::{compile, detect, CompiledInvocation, RunError, RuntimeKind};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: EntrySource,

    /// Set an environment variable inside the container (NAME=VALUE)
    #[arg(short = 'e', long = "env", value_name = "NAME=VALUE")]
    pub env: Vec<String>,

    /// Publish a container port (HOST:CONTAINER)
    #[arg(short = 'p', long = "port", value_name = "HOST:CONTAINER")]
    pub ports: Vec<String>,

    /// Extra flags passed verbatim to the runtime's `run` command
    #[arg(long = "user-args", alias = "userArgs", value_name = "ARGS", allow_hyphen_values = true)]
    pub user_args: Vec<String>,

    /// Container name
    #[arg(long)]
    pub name: Option<String>,

    /// Host directory mounted as the project (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Host directory holding per-entry cache folders
    #[arg(long, value_name = "DIR", env = "ENVCTL_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    #[arg(long, env = "http_proxy", hide_env_values = true)]
    pub http_proxy: Option<String>,

    #[arg(long, env = "https_proxy", hide_env_values = true)]
    pub https_proxy: Option<String>,

    /// Print the compiled command line instead of executing it
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the command as a JSON array of tokens
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Command and arguments to run inside the container
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

pub fn execute(args: RunArgs, global: &GlobalArgs) -> Result<()> {
    let host = global.host_context();
    let entry = args.source.load()?;

    let current_dir = env::current_dir()
        .and_then(dunce::canonicalize)
        .context("Failed to determine current directory")?;
    let project_dir = match &args.project_dir {
        Some(dir) => dunce::canonicalize(current_dir.join(dir)).with_context(|| {
            format!("Failed to resolve project directory '{}'", dir.display())
        })?,
        None => current_dir.clone(),
    };

    let runtime = detect();
    if runtime == RuntimeKind::None {
        return Err(RunError::NoRuntimeFound.into());
    }

    debug!(
        command = ?args.command,
        image = %entry.image,
        "received run request"
    );

    let request = RunRequest {
        entry,
        args: args.command,
        env: args.env,
        ports: args.ports,
        user_args: args.user_args,
        name: args.name,
        project_dir,
        current_dir,
        cache_path: args.cache_path,
        proxy: ProxySettings {
            http: args.http_proxy,
            https: args.https_proxy,
        },
    };

    let host_env = env::vars_os().filter_map(|(name, value)| {
        Some((name.into_string().ok()?, value.into_string().ok()?))
    });
    let spec = build_run_spec(&request, runtime, &host, host_env)?;
    let invocation = compile(&spec, runtime, &host)?;

    if args.dry_run {
        return print_invocation(&invocation, args.json);
    }

    info!(image = %spec.image, runtime = %runtime, "executing command in container");
    container_runtime::run(&invocation, &host.platform)?;
    Ok(())
}

pub(crate) fn print_invocation(invocation: &CompiledInvocation, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string(invocation.tokens())
            .context("Failed to render command tokens as JSON")?;
        println!("{}", rendered);
    } else {
        println!("{}", invocation);
    }
    Ok(())
}
