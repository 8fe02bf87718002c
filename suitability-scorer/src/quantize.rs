//! Conversion of combined scores to the stored 0-100 scale.

use suitability_core::{EngineConfig, Grid, GridError, GridSpec};

pub use suitability_core::config::MAX_SCORE;

use crate::CombinedGrid;

/// Maps combined scores to integer percentages.
///
/// Scores are scaled by 100, rounded half to even, clamped to `0..=100` and
/// stored as `u8`. Undefined and non-finite cells receive the nodata
/// sentinel instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    nodata: u8,
}

impl Quantizer {
    /// A quantizer writing `nodata` for undefined cells.
    ///
    /// # Errors
    /// Returns [`GridError::NodataCollision`] when `nodata` is at most
    /// [`MAX_SCORE`], since such a sentinel would hide real scores.
    pub const fn new(nodata: u8) -> Result<Self, GridError> {
        if nodata <= MAX_SCORE {
            return Err(GridError::NodataCollision {
                nodata,
                max: MAX_SCORE,
            });
        }
        Ok(Self { nodata })
    }

    /// The quantizer configured by `config`.
    #[must_use]
    pub const fn for_config(config: &EngineConfig) -> Self {
        Self {
            nodata: config.nodata(),
        }
    }

    /// Sentinel written for undefined cells.
    #[must_use]
    pub const fn nodata(&self) -> u8 {
        self.nodata
    }

    /// Quantize a single combined score.
    ///
    /// # Examples
    /// ```
    /// use suitability_scorer::Quantizer;
    ///
    /// let quantizer = Quantizer::new(255).unwrap();
    /// assert_eq!(quantizer.quantize_score(Some(0.125)), 12);
    /// assert_eq!(quantizer.quantize_score(Some(0.375)), 38);
    /// assert_eq!(quantizer.quantize_score(Some(1.7)), 100);
    /// assert_eq!(quantizer.quantize_score(None), 255);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the clamped percentage fits in u8"
    )]
    pub fn quantize_score(&self, score: Option<f32>) -> u8 {
        match score {
            Some(value) if value.is_finite() => {
                (value * 100.0)
                    .round_ties_even()
                    .clamp(0.0, f32::from(MAX_SCORE)) as u8
            }
            _ => self.nodata,
        }
    }

    /// Quantize every cell of `combined`.
    #[must_use]
    pub fn quantize(&self, combined: &CombinedGrid) -> SuitabilityGrid {
        SuitabilityGrid {
            grid: combined.grid().map(|score| self.quantize_score(*score)),
            nodata: self.nodata,
        }
    }
}

/// Final per-preset output: scores `0..=100` plus a nodata sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct SuitabilityGrid {
    grid: Grid<u8>,
    nodata: u8,
}

impl SuitabilityGrid {
    /// Shape and transform of the scores.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        self.grid.spec()
    }

    /// The quantized grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    /// Sentinel marking undefined cells.
    #[must_use]
    pub const fn nodata(&self) -> u8 {
        self.nodata
    }

    /// Score at `(row, col)`, or `None` when the cell is undefined or
    /// outside the grid.
    #[must_use]
    pub fn score(&self, row: u32, col: u32) -> Option<u8> {
        self.grid
            .get(row, col)
            .copied()
            .filter(|value| *value != self.nodata)
    }

    /// Consume the output, returning the grid and its sentinel.
    #[must_use]
    pub fn into_parts(self) -> (Grid<u8>, u8) {
        (self.grid, self.nodata)
    }
}
