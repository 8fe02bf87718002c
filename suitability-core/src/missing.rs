//! Normalization of whole factor grids under the missing-data policy.

use crate::{Factor, FactorGrid, Grid, GridSpec};

/// Decides the normalized value of cells without a real measurement.
///
/// Unmeasured cells receive a fixed neutral score instead of propagating
/// "unknown" into the weighted sum. The substitution is applied per factor
/// and per cell, before combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingDataPolicy {
    neutral_score: f32,
}

impl MissingDataPolicy {
    /// Policy substituting `neutral_score`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(neutral_score: f32) -> Self {
        Self {
            neutral_score: neutral_score.clamp(0.0, 1.0),
        }
    }

    /// The substituted score.
    #[must_use]
    pub const fn neutral_score(&self) -> f32 {
        self.neutral_score
    }

    /// Normalize every cell of `raw`, substituting the neutral score for
    /// cells that are not real measurements.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::{Factor, FactorGrid, GridSpec, MissingDataPolicy};
    ///
    /// let raw = FactorGrid::from_cells(
    ///     Factor::Solar,
    ///     GridSpec::unit(2, 1),
    ///     vec![4.5, -9999.0],
    ///     Some(-9999.0),
    /// )
    /// .unwrap();
    /// let normalized = MissingDataPolicy::new(0.6).apply(&raw);
    /// assert_eq!(normalized.grid().cells(), &[0.5, 0.6]);
    /// assert_eq!(normalized.measured(), &[true, false]);
    /// ```
    #[must_use]
    pub fn apply(&self, raw: &FactorGrid) -> NormalizedFactor {
        let factor = raw.factor();
        let (values, measured): (Vec<f32>, Vec<bool>) = raw
            .grid()
            .cells()
            .iter()
            .map(|&value| {
                if raw.is_measured(value) {
                    (factor.normalize(value), true)
                } else {
                    (self.neutral_score, false)
                }
            })
            .unzip();
        NormalizedFactor {
            factor,
            grid: Grid::from_parts(*raw.grid().spec(), values),
            measured,
        }
    }
}

impl Default for MissingDataPolicy {
    fn default() -> Self {
        Self::new(crate::config::NEUTRAL_SCORE)
    }
}

/// A factor grid mapped onto `0.0..=1.0`, with per-cell provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFactor {
    factor: Factor,
    grid: Grid<f32>,
    measured: Vec<bool>,
}

impl NormalizedFactor {
    /// The factor these scores describe.
    #[must_use]
    pub const fn factor(&self) -> Factor {
        self.factor
    }

    /// Normalized scores.
    #[must_use]
    pub const fn grid(&self) -> &Grid<f32> {
        &self.grid
    }

    /// Shape and transform of the scores.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        self.grid.spec()
    }

    /// Per-cell flags: `true` where the score came from a real measurement,
    /// `false` where the neutral score was substituted.
    #[must_use]
    pub fn measured(&self) -> &[bool] {
        &self.measured
    }

    /// Score and provenance at a row-major index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<(f32, bool)> {
        let value = self.grid.cells().get(index)?;
        let measured = self.measured.get(index)?;
        Some((*value, *measured))
    }
}
