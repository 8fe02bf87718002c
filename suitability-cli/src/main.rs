//! Entry point for the `offgrid` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use suitability_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout carries only the JSON report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    match suitability_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("offgrid: {err}");
            ExitCode::FAILURE
        }
    }
}
