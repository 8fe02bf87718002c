//! Artefact I/O and run orchestration for the suitability engine.
//!
//! Responsibilities:
//! - Read factor rasters and the exclusion mask from a data directory,
//!   following a fixed filename convention.
//! - Load the preset document.
//! - Score every preset and write one raster per preset, atomically.
//!
//! Boundaries:
//! - Scoring rules live in `suitability-core` and `suitability-scorer`.
//! - Reprojection of source datasets onto the target grid happens upstream.
//!
//! A missing factor artefact is not an error: it is logged and the run
//! proceeds with a reduced factor set.
#![forbid(unsafe_code)]

mod artefact;
mod layout;
mod run;

pub use artefact::{
    ARTEFACT_EXTENSION, ArtefactError, Raster, read_raster, read_raster_spec, write_raster,
};
pub use layout::{DataLayout, FACTORS_DIR, MASK_STEM, PROCESSED_DIR};
pub use run::{
    LoadedFactors, PresetReport, PresetStatus, RunError, RunReport, discover_target, load_factors,
    load_mask, load_presets, run_presets,
};
