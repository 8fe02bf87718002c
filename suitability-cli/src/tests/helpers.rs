//! Test helpers for laying out data directories and preset documents.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use suitability_core::{Factor, Grid, GridSpec};
use suitability_data::{DataLayout, Raster, write_raster};
use tempfile::TempDir;

/// Raw values at the reference site, in canonical factor order.
const REFERENCE_SITE: [f32; 5] = [4.5, 0.9, 100.0, 30.0, 0.3];
const NODATA: f32 = -9999.0;

pub(super) const PRESET_DOCUMENT: &str = r#"{"presets": {
    "balanced": {"id": "A", "name": "Balanced", "weights": {
        "solar": 0.25, "water": 0.25, "remoteness": 0.20, "population": 0.15, "flood": 0.15}},
    "water_first": {"id": "B", "name": "Water first", "weights": {
        "solar": 0.20, "water": 0.40, "remoteness": 0.15, "population": 0.10, "flood": 0.15}},
    "remote": {"id": "C", "name": "Remote living", "weights": {
        "solar": 0.20, "water": 0.20, "remoteness": 0.35, "population": 0.15, "flood": 0.10}}
}}"#;

/// A temporary project with a data directory, an output directory and a
/// preset document path.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn data_dir(&self) -> Utf8PathBuf {
        self.root.join("data")
    }

    pub(super) fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    pub(super) fn presets(&self) -> Utf8PathBuf {
        self.root.join("presets.json")
    }

    pub(super) fn layout(&self) -> DataLayout {
        DataLayout::new(self.data_dir(), self.out_dir())
    }

    /// Write all five factors on a 2x1 grid: the reference site, then a
    /// cell without any measurement.
    pub(super) fn write_factors(&self) {
        let layout = self.layout();
        for (factor, value) in Factor::ALL.into_iter().zip(REFERENCE_SITE) {
            let grid = Grid::new(GridSpec::unit(2, 1), vec![value, NODATA]).expect("factor grid");
            write_raster(&layout.factor_path(factor), &Raster::new(grid, Some(NODATA)))
                .expect("write factor artefact");
        }
    }

    pub(super) fn write_presets(&self) {
        write_utf8(&self.presets(), PRESET_DOCUMENT.as_bytes());
    }

    /// CLI arguments pointing at this workspace, scoring on the input grid.
    pub(super) fn argv(&self) -> Vec<String> {
        vec![
            "offgrid".to_owned(),
            "score".to_owned(),
            format!("--{}", crate::ARG_DATA_DIR),
            self.data_dir().into_string(),
            format!("--{}", crate::ARG_OUT_DIR),
            self.out_dir().into_string(),
            format!("--{}", crate::ARG_PRESETS),
            self.presets().into_string(),
            format!("--{}", crate::ARG_GRID),
            "inputs".to_owned(),
        ]
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.as_std_path()).expect("create parent directory");
    }
    fs::write(path.as_std_path(), contents).expect("write file");
}
