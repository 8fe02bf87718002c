//! Facade crate for the off-grid suitability engine.
//!
//! This crate re-exports the data model, the scoring pipeline and, behind the
//! `artefacts` feature, the artefact readers and writers used by batch runs.

#![forbid(unsafe_code)]

pub use suitability_core::{
    ConfigurationError, EngineConfig, ExclusionMask, Factor, FactorGrid, GeoTransform, Grid,
    GridError, GridSpec, MissingDataPolicy, NormalizedFactor, Preset, PresetRegistry, WeightSet,
};

pub use suitability_scorer::{
    CellBreakdown, CombinedGrid, FactorSet, PresetOutcome, Quantizer, ScoreError,
    SuitabilityClass, SuitabilityEngine, SuitabilityGrid, WeightedCombiner,
};

#[cfg(feature = "artefacts")]
pub use suitability_data::{
    ArtefactError, DataLayout, Raster, RunError, RunReport, load_presets, run_presets,
};
