//! Scoring every preset over the artefacts of a data directory.

use std::error::Error as StdError;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use serde::Serialize;
use suitability_core::{
    ConfigurationError, ExclusionMask, Factor, FactorGrid, GridError, GridSpec, PresetRegistry,
};
use suitability_fs::{ensure_dir, file_is_file, open_utf8_file};
use suitability_scorer::{PresetOutcome, SuitabilityEngine, SuitabilityGrid};
use thiserror::Error;

use crate::{ArtefactError, DataLayout, Raster, read_raster, read_raster_spec, write_raster};

/// Errors that abort a whole run.
///
/// Problems specific to one preset are reported in the [`RunReport`]
/// instead.
#[derive(Debug, Error)]
pub enum RunError {
    /// The preset document is missing or invalid.
    #[error(transparent)]
    Presets(#[from] ConfigurationError),
    /// The preset document exists but could not be read.
    #[error("failed to read preset configuration at {path}")]
    ReadPresets {
        /// Document path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// An input artefact exists but is unusable.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    /// The exclusion mask holds values other than 0 and 1.
    #[error("exclusion mask at {path} is invalid")]
    InvalidMask {
        /// Mask path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: GridError,
    },
    /// Checking for an input or creating the output directory failed.
    #[error("failed to access {path}")]
    Filesystem {
        /// Path concerned.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
}

/// Load the preset document at `path`.
///
/// # Errors
/// Returns [`ConfigurationError::MissingDocument`] (wrapped in
/// [`RunError::Presets`]) when no document exists, and the parse errors of
/// [`PresetRegistry::from_json_str`].
pub fn load_presets(path: &Utf8Path) -> Result<PresetRegistry, RunError> {
    let mut file = match open_utf8_file(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigurationError::MissingDocument {
                location: path.to_string(),
            }
            .into());
        }
        Err(source) => {
            return Err(RunError::ReadPresets {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut document = String::new();
    io::Read::read_to_string(&mut file, &mut document).map_err(|source| RunError::ReadPresets {
        path: path.to_path_buf(),
        source,
    })?;
    let registry = PresetRegistry::from_json_str(&document)?;
    for (id, err) in registry.rejected() {
        warn!("preset {id} in {path} is unusable: {}", describe(err));
    }
    info!("loaded {} presets from {path}", registry.len());
    Ok(registry)
}

/// Raw factor rasters found under a layout.
#[derive(Debug, Default)]
pub struct LoadedFactors {
    /// Factors whose artefact was read.
    pub grids: Vec<FactorGrid>,
    /// Factors whose artefact does not exist.
    pub missing: Vec<Factor>,
}

/// Read every factor artefact that exists.
///
/// Absent artefacts are logged and skipped; the run continues with a
/// reduced factor set.
///
/// # Errors
/// Returns [`RunError`] when an existing artefact cannot be read or
/// decoded.
pub fn load_factors(layout: &DataLayout) -> Result<LoadedFactors, RunError> {
    let mut loaded = LoadedFactors::default();
    for factor in Factor::ALL {
        let path = layout.factor_path(factor);
        if !exists(&path)? {
            warn!("{factor} artefact not found at {path}; continuing without it");
            loaded.missing.push(factor);
            continue;
        }
        let raster: Raster<f32> = read_raster(&path)?;
        info!("loaded {factor} from {path}");
        loaded.grids.push(raster.into_factor(factor));
    }
    Ok(loaded)
}

/// Read the exclusion mask, if one exists.
///
/// # Errors
/// Returns [`RunError`] when the mask exists but cannot be read or holds
/// values other than 0 and 1.
pub fn load_mask(layout: &DataLayout) -> Result<Option<ExclusionMask>, RunError> {
    let path = layout.mask_path();
    if !exists(&path)? {
        info!("no exclusion mask at {path}");
        return Ok(None);
    }
    let raster: Raster<u8> = read_raster(&path)?;
    let mask = raster
        .into_mask()
        .map_err(|source| RunError::InvalidMask { path, source })?;
    Ok(Some(mask))
}

/// Grid spec of the first factor artefact present, in canonical order.
///
/// Lets a run adopt the grid its inputs were prepared on instead of the
/// production grid.
///
/// # Errors
/// Returns [`RunError`] when an existing artefact header cannot be read.
pub fn discover_target(layout: &DataLayout) -> Result<Option<GridSpec>, RunError> {
    for factor in Factor::ALL {
        let path = layout.factor_path(factor);
        if exists(&path)? {
            let spec = read_raster_spec(&path)?;
            info!(
                "adopting the {}x{} grid of {path}",
                spec.width(),
                spec.height()
            );
            return Ok(Some(spec));
        }
    }
    Ok(None)
}

fn exists(path: &Utf8Path) -> Result<bool, RunError> {
    file_is_file(path).map_err(|source| RunError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

/// Per-preset result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetReport {
    /// Identifier of the preset.
    pub preset: String,
    /// What happened to it.
    #[serde(flatten)]
    pub status: PresetStatus,
}

/// Outcome of one preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PresetStatus {
    /// The output raster was written.
    Written {
        /// Path of the output raster.
        path: Utf8PathBuf,
    },
    /// The preset produced no output.
    Failed {
        /// Machine-readable error kind.
        kind: String,
        /// Human-readable cause, including nested sources.
        cause: String,
    },
}

/// Summary of a run over several presets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Factors that were unavailable for every preset.
    pub missing_factors: Vec<Factor>,
    /// Factors dropped because their grid was misaligned.
    pub rejected_factors: Vec<String>,
    /// One entry per requested preset, in request order.
    pub presets: Vec<PresetReport>,
}

impl RunReport {
    /// Report whether every preset was written.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.presets
            .iter()
            .all(|report| matches!(report.status, PresetStatus::Written { .. }))
    }

    /// Presets that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PresetReport> {
        self.presets
            .iter()
            .filter(|report| matches!(report.status, PresetStatus::Failed { .. }))
    }
}

/// Score presets over the artefacts of `layout` and write one raster per
/// successful preset.
///
/// With `only`, just the named presets are scored, in the given order;
/// unknown names fail individually. One preset failing never prevents the
/// others from being written.
///
/// # Errors
/// Returns [`RunError`] for problems shared by every preset, such as an
/// unreadable input artefact or an unusable output directory.
pub fn run_presets(
    engine: &SuitabilityEngine,
    layout: &DataLayout,
    registry: &PresetRegistry,
    only: Option<&[String]>,
) -> Result<RunReport, RunError> {
    let loaded = load_factors(layout)?;
    let mask = load_mask(layout)?;
    let (factors, rejected) = engine.normalize_all(&loaded.grids);
    ensure_dir(layout.out_dir()).map_err(|source| RunError::Filesystem {
        path: layout.out_dir().to_path_buf(),
        source,
    })?;

    let outcomes = match only {
        Some(ids) => engine.score_selected(registry, ids, &factors, mask.as_ref()),
        None => engine.score_all(registry, &factors, mask.as_ref()),
    };
    let presets = outcomes
        .into_iter()
        .map(|outcome| write_outcome(layout, outcome))
        .collect();

    Ok(RunReport {
        missing_factors: loaded.missing,
        rejected_factors: rejected.iter().map(|err| describe(err)).collect(),
        presets,
    })
}

fn write_outcome(layout: &DataLayout, outcome: PresetOutcome) -> PresetReport {
    let (preset, result) = outcome.into_parts();
    let status = match result {
        Ok(grid) => write_output(layout, &preset, grid),
        Err(err) => PresetStatus::Failed {
            kind: err.kind().to_owned(),
            cause: describe(&err),
        },
    };
    PresetReport { preset, status }
}

fn write_output(layout: &DataLayout, preset: &str, output: SuitabilityGrid) -> PresetStatus {
    let path = layout.output_path(preset);
    let (grid, nodata) = output.into_parts();
    match write_raster(&path, &Raster::new(grid, Some(nodata))) {
        Ok(()) => {
            info!("wrote preset {preset} to {path}");
            PresetStatus::Written { path }
        }
        Err(err) => {
            warn!("could not write preset {preset}: {err}");
            PresetStatus::Failed {
                kind: "artefact_write".to_owned(),
                cause: describe(&err),
            }
        }
    }
}

/// Render an error and its chain of sources on one line.
fn describe(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
