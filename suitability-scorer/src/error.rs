//! Error types raised while scoring a preset.

use suitability_core::{ConfigurationError, GridError};
use thiserror::Error;

/// Errors raised while combining factors for one preset.
///
/// Every variant is fatal for the preset concerned only; callers scoring
/// several presets report the failure and continue with the rest.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The preset could not be resolved or is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A factor or mask grid is not aligned with the target grid.
    #[error("input grid is not aligned with the target grid")]
    InputGridShapeMismatch {
        /// Description of the mismatch.
        #[source]
        source: GridError,
    },
    /// None of the preset's weighted factors is available.
    #[error("no factors are available to score preset {preset}")]
    NoFactorsAvailable {
        /// Identifier of the affected preset.
        preset: String,
    },
}

impl ScoreError {
    /// Stable, machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InputGridShapeMismatch { .. } => "input_grid_shape_mismatch",
            Self::NoFactorsAvailable { .. } => "no_factors_available",
        }
    }
}

impl From<GridError> for ScoreError {
    fn from(source: GridError) -> Self {
        Self::InputGridShapeMismatch { source }
    }
}
