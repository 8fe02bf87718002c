//! Where a run finds its inputs and puts its outputs.

use camino::{Utf8Path, Utf8PathBuf};
use suitability_core::Factor;

use crate::artefact::ARTEFACT_EXTENSION;

/// Subdirectory of the data directory holding reprojected factor rasters.
pub const PROCESSED_DIR: &str = "processed";
/// Subdirectory of the data directory holding derived layers.
pub const FACTORS_DIR: &str = "factors";
/// Stem of the exclusion mask artefact.
pub const MASK_STEM: &str = "protected_mask";

/// Filename conventions for one run.
///
/// ```text
/// <data_dir>/processed/<factor stem>.grid
/// <data_dir>/factors/protected_mask.grid
/// <out_dir>/suitability_<preset id>.grid
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: Utf8PathBuf,
    out_dir: Utf8PathBuf,
}

impl DataLayout {
    /// Layout rooted at `data_dir`, writing to `out_dir`.
    pub fn new(data_dir: impl Into<Utf8PathBuf>, out_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    /// Root of the inputs.
    #[must_use]
    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    /// Directory receiving one raster per preset.
    #[must_use]
    pub fn out_dir(&self) -> &Utf8Path {
        &self.out_dir
    }

    /// Raw raster for `factor`.
    #[must_use]
    pub fn factor_path(&self, factor: Factor) -> Utf8PathBuf {
        self.data_dir
            .join(PROCESSED_DIR)
            .join(factor.artefact_stem())
            .with_extension(ARTEFACT_EXTENSION)
    }

    /// Optional exclusion mask.
    #[must_use]
    pub fn mask_path(&self) -> Utf8PathBuf {
        self.data_dir
            .join(FACTORS_DIR)
            .join(MASK_STEM)
            .with_extension(ARTEFACT_EXTENSION)
    }

    /// Output raster for the preset `id`.
    #[must_use]
    pub fn output_path(&self, id: &str) -> Utf8PathBuf {
        self.out_dir
            .join(format!("suitability_{id}.{ARTEFACT_EXTENSION}"))
    }
}
