//! Weighted combination, masking and quantization of suitability factors.
//!
//! The crate turns a set of normalized factor grids into one integer
//! suitability grid per preset:
//! - [`WeightedCombiner`] sums `weight * score` over the factors that are
//!   available, without renormalizing the weights of absent ones.
//! - [`CombinedGrid::apply_mask`] forces excluded cells to zero.
//! - [`Quantizer`] scales to percent, rounds half to even and clamps to
//!   `0..=100`, writing a nodata sentinel for undefined cells.
//! - [`SuitabilityEngine`] runs the pipeline for one preset or for every
//!   preset of a registry in parallel, isolating per-preset failures.
//!
//! # Examples
//!
//! ```
//! use suitability_core::{EngineConfig, Factor, FactorGrid, GridSpec, PresetRegistry};
//! use suitability_scorer::SuitabilityEngine;
//!
//! let spec = GridSpec::unit(2, 1);
//! let engine = SuitabilityEngine::new(EngineConfig::new(spec));
//! let solar = FactorGrid::from_cells(Factor::Solar, spec, vec![6.0, -1.0], Some(-1.0)).unwrap();
//! let (factors, rejected) = engine.normalize_all(&[solar]);
//! assert!(rejected.is_empty());
//!
//! let registry = PresetRegistry::builtin().unwrap();
//! let outcomes = engine.score_all(&registry, &factors, None);
//! let balanced = outcomes[0].result().as_ref().unwrap();
//! // Only solar is available and it carries a weight of 0.25.
//! assert_eq!(balanced.score(0, 0), Some(25));
//! // The second cell holds no measurement at all.
//! assert_eq!(balanced.score(0, 1), None);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod combine;
mod engine;
mod error;
mod inspect;
mod mask;
mod quantize;

pub use combine::{CombinedGrid, FactorSet, WeightedCombiner};
pub use engine::{PresetOutcome, SuitabilityEngine};
pub use error::ScoreError;
pub use inspect::{CellBreakdown, FactorContribution, SuitabilityClass};
pub use quantize::{MAX_SCORE, Quantizer, SuitabilityGrid};

#[cfg(test)]
mod tests;
