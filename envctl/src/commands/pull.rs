use super::run::print_invocation;
use super::{EntrySource, GlobalArgs};
use anyhow::Result;
use clap::Args;
use container_runtime::{compile_pull, detect};
use tracing::info;

#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub source: EntrySource,

    /// Print the pull command instead of executing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: PullArgs, global: &GlobalArgs) -> Result<()> {
    let host = global.host_context();
    let entry = args.source.load()?;
    let runtime = detect();
    let invocation = compile_pull(&entry.image, runtime, &host)?;

    if args.dry_run {
        return print_invocation(&invocation, false);
    }

    info!(image = %entry.image, runtime = %runtime, "pulling image");
    container_runtime::run(&invocation, &host.platform)?;
    Ok(())
}
