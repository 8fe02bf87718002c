//! Core data model for the off-grid suitability engine.
//!
//! The crate defines the raster geometry every layer shares, the five factor
//! transfer functions, the missing-data policy, exclusion masks and the
//! preset weights that the scorer combines. Everything here is pure: grids
//! are immutable once built and no function performs I/O.
//!
//! # Examples
//!
//! ```
//! use suitability_core::{Factor, FactorGrid, GridSpec, MissingDataPolicy};
//!
//! let raw = FactorGrid::from_cells(Factor::Water, GridSpec::unit(2, 1), vec![0.3, 0.9], None)
//!     .unwrap();
//! let normalized = MissingDataPolicy::default().apply(&raw);
//! assert_eq!(normalized.grid().cells(), &[1.0, 0.4]);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
mod error;
pub mod factor;
pub mod grid;
pub mod mask;
pub mod missing;
pub mod normalize;
pub mod preset;

pub use config::EngineConfig;
pub use error::ConfigurationError;
pub use factor::{Factor, FactorGrid, UnknownFactor};
pub use grid::{GeoTransform, Grid, GridError, GridSpec};
pub use mask::ExclusionMask;
pub use missing::{MissingDataPolicy, NormalizedFactor};
pub use preset::{Preset, PresetRegistry, WeightSet};
