//! Score command implementation for the `offgrid` CLI.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use suitability_core::EngineConfig;
use suitability_data::{DataLayout, RunReport, discover_target, load_presets, run_presets};
use suitability_scorer::SuitabilityEngine;

use crate::{
    ARG_DATA_DIR, ARG_GRID, ARG_ONLY, ARG_OUT_DIR, ARG_PRESETS, CliError, DEFAULT_DATA_DIR,
    DEFAULT_OUT_DIR, DEFAULT_PRESETS,
};

/// Which grid the run scores on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TargetGrid {
    /// The production WGS84 grid at 30 arc-second resolution.
    #[default]
    Global,
    /// The grid of the first factor artefact found.
    Inputs,
}

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score suitability presets over prepared factor rasters. \
                 Factor rasters are read from <data-dir>/processed and the \
                 optional exclusion mask from <data-dir>/factors. One raster \
                 per preset is written to the output directory and a JSON \
                 report is printed on stdout.",
    about = "Score suitability presets"
)]
#[ortho_config(prefix = "OFFGRID")]
pub(crate) struct ScoreArgs {
    /// Directory holding the prepared inputs.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Directory receiving one raster per preset.
    #[arg(long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) out_dir: Option<Utf8PathBuf>,
    /// Path to the JSON preset document.
    #[arg(long = ARG_PRESETS, value_name = "path")]
    #[serde(default)]
    pub(crate) presets: Option<Utf8PathBuf>,
    /// Comma-separated preset ids to score instead of all of them.
    #[arg(long = ARG_ONLY, value_name = "ids")]
    #[serde(default)]
    pub(crate) only: Option<String>,
    /// Grid to score on.
    #[arg(long = ARG_GRID, value_enum)]
    #[serde(default)]
    pub(crate) grid: Option<TargetGrid>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Directory holding the prepared inputs.
    pub(crate) data_dir: Utf8PathBuf,
    /// Directory receiving the outputs.
    pub(crate) out_dir: Utf8PathBuf,
    /// Path to the preset document.
    pub(crate) presets: Utf8PathBuf,
    /// Presets to score, in order; `None` scores all of them.
    pub(crate) only: Option<Vec<String>>,
    /// Grid to score on.
    pub(crate) grid: TargetGrid,
}

impl ScoreConfig {
    fn layout(&self) -> DataLayout {
        DataLayout::new(self.data_dir.clone(), self.out_dir.clone())
    }

    fn engine_config(&self, layout: &DataLayout) -> Result<EngineConfig, CliError> {
        match self.grid {
            TargetGrid::Global => EngineConfig::global().map_err(CliError::TargetGrid),
            TargetGrid::Inputs => discover_target(layout)?
                .map(EngineConfig::new)
                .ok_or_else(|| CliError::NoInputs {
                    data_dir: self.data_dir.clone(),
                }),
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let only = args.only.as_deref().map(parse_selection).transpose()?;
        Ok(Self {
            data_dir: args
                .data_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR)),
            out_dir: args
                .out_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR)),
            presets: args
                .presets
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_PRESETS)),
            only,
            grid: args.grid.unwrap_or_default(),
        })
    }
}

/// Split a comma-separated list of preset ids, dropping blanks.
fn parse_selection(raw: &str) -> Result<Vec<String>, CliError> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if ids.is_empty() {
        return Err(CliError::EmptySelection { field: ARG_ONLY });
    }
    Ok(ids)
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

/// Score the configured presets, print the report and fail when any
/// preset failed.
pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_score(args)?;
    write_report(writer, &report)?;
    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::PresetsFailed {
            failed,
            total: report.presets.len(),
        });
    }
    Ok(())
}

fn execute_score(args: ScoreArgs) -> Result<RunReport, CliError> {
    let config = args.into_config()?;
    let registry = load_presets(&config.presets)?;
    let layout = config.layout();
    let engine = SuitabilityEngine::new(config.engine_config(&layout)?);
    info!(
        "scoring {} from {} into {}",
        config
            .only
            .as_ref()
            .map_or_else(|| "every preset".to_owned(), |ids| ids.join(",")),
        layout.data_dir(),
        layout.out_dir()
    );
    run_presets(&engine, &layout, &registry, config.only.as_deref()).map_err(CliError::from)
}

fn write_report(writer: &mut dyn Write, report: &RunReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
