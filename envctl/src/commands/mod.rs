pub mod detect;
pub mod pull;
pub mod run;

use crate::entry::RunEntry;
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use container_runtime::{HostContext, DEFAULT_MACHINE_NAME};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "envctl",
    version,
    about = "Runs project tooling inside ephemeral containers"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Log filter, e.g. `debug` or `envctl=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long, global = true, env = "ENVCTL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "ENVCTL_LOG_JSON")]
    pub log_json: bool,

    /// docker-machine VM hosting the Docker Toolbox daemon
    #[arg(long, global = true, env = "ENVCTL_MACHINE", default_value = DEFAULT_MACHINE_NAME)]
    pub machine: String,
}

impl GlobalArgs {
    pub fn host_context(&self) -> HostContext {
        HostContext::detect(self.machine.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command inside the container of its run entry
    Run(run::RunArgs),
    /// Pull the image of a run entry
    Pull(pull::PullArgs),
    /// Print the container runtime that would be used
    Detect,
    /// Print version and exit
    Version,
}

/// Where the run entry comes from: a YAML file or a bare image reference.
#[derive(Args, Debug, Clone)]
pub struct EntrySource {
    /// Resolved run entry (YAML)
    #[arg(long, value_name = "FILE", env = "ENVCTL_ENTRY")]
    pub entry: Option<PathBuf>,

    /// Run an image directly with default entry settings (takes precedence over --entry)
    #[arg(long, value_name = "IMAGE")]
    pub image: Option<String>,
}

impl EntrySource {
    pub fn load(&self) -> Result<RunEntry> {
        match (&self.entry, &self.image) {
            (_, Some(image)) => {
                let entry = RunEntry::for_image(image.clone());
                entry.validate()?;
                Ok(entry)
            }
            (Some(path), None) => RunEntry::from_path(path),
            (None, None) => bail!("Either --entry <FILE> or --image <IMAGE> is required"),
        }
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Run(args) => run::execute(args, &cli.global),
        Commands::Pull(args) => pull::execute(args, &cli.global),
        Commands::Detect => detect::execute(),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
