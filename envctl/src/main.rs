use clap::Parser;
use envctl::commands::{dispatch, Cli};
use envctl::logging::init_tracing;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.log_level.as_deref(), cli.global.log_json);

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
