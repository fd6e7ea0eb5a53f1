//! Entry point for the `tattle` CLI. It parses arguments, dispatches to the
//! appropriate command handler, and maps errors to exit codes.

use std::process::ExitCode;
use tattle::cli::Cli;
use tattle::{commands, exit_codes, logging};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(err) = logging::init_tracing(cli.global.verbose) {
        eprintln!("Warning: {}", err);
    }

    match commands::dispatch(&cli.global, cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // User-actionable message on stderr; the build log stays on stdout.
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
