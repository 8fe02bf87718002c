//! Command-line interface for the off-grid suitability engine.
//!
//! The `offgrid score` command scores every configured preset over a data
//! directory of prepared factor rasters and prints a JSON run report.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod score;

pub use error::CliError;

use score::{ScoreArgs, run_score};

pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_OUT_DIR: &str = "out-dir";
pub(crate) const ARG_PRESETS: &str = "presets";
pub(crate) const ARG_ONLY: &str = "only";
pub(crate) const ARG_GRID: &str = "grid";
pub(crate) const DEFAULT_DATA_DIR: &str = "data";
pub(crate) const DEFAULT_OUT_DIR: &str = "out/suitability";
pub(crate) const DEFAULT_PRESETS: &str = "web/config/presets.json";

/// Run the `offgrid` CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, when
/// the run cannot start, or when any preset fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "offgrid",
    about = "Score land for off-grid living from prepared factor rasters",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score presets and write one suitability raster per preset.
    Score(ScoreArgs),
}

#[cfg(test)]
mod tests;
