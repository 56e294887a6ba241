use clap::Parser;
use std::process::ExitCode;

use mpvss::cli::{self, Cli};

fn main() -> ExitCode {
    let args = Cli::parse();
    if let Err(err) = cli::setup_logger(args.verbose) {
        eprintln!("failed to set up logger: {err}");
    }
    mpvss::run(&args)
}
