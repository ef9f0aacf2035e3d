use std::process::ExitCode;

use clap::Parser;
use console::style;
use constellation::cli::{init_logging, run, Cli, Status};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(Status::Clean) => ExitCode::SUCCESS,
        Ok(Status::PendingChanges) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
