// Entrypoint for the `bitlink` command.
// - Keeps `main` small: parse arguments, start logging, hand off to `ui::run`.
// - Result goes to stdout; any error goes to stderr with exit code 1.

use std::process::ExitCode;

use bitlink_cli::{telemetry, ui};
use clap::Parser;

fn main() -> ExitCode {
    let cli = ui::Cli::parse();
    telemetry::init_tracing(cli.log_level());

    match ui::run(&cli) {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
