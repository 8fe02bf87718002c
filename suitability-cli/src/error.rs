//! Error types emitted by the `offgrid` CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use suitability_core::GridError;
use suitability_data::RunError;
use thiserror::Error;

/// Errors emitted by the `offgrid` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The preset selection named no presets.
    #[error("--{field} must name at least one preset id")]
    EmptySelection {
        /// Flag carrying the selection.
        field: &'static str,
    },
    /// The production target grid could not be derived.
    #[error("failed to derive the target grid: {0}")]
    TargetGrid(#[source] GridError),
    /// The target grid was to come from the inputs but none exist.
    #[error("no factor artefacts under {data_dir:?} to take the target grid from")]
    NoInputs {
        /// Data directory searched.
        data_dir: Utf8PathBuf,
    },
    /// The run could not start or aborted before scoring.
    #[error(transparent)]
    Run(#[from] Box<RunError>),
    /// Serializing the run report failed.
    #[error("failed to serialize run report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing the run report failed.
    #[error("failed to write run report: {0}")]
    WriteReport(#[source] std::io::Error),
    /// At least one preset produced no output.
    #[error("{failed} of {total} presets failed; see the report for causes")]
    PresetsFailed {
        /// Presets that failed.
        failed: usize,
        /// Presets requested.
        total: usize,
    },
}

impl From<RunError> for CliError {
    fn from(source: RunError) -> Self {
        Self::Run(Box::new(source))
    }
}
