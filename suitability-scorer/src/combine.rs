//! Weighted combination of normalized factors.
//!
//! The combined score of a cell is the sum of `weight * score` over the
//! preset's factors that are actually available. Absent factors contribute
//! nothing and the remaining weights are not renormalized, so a run missing
//! a factor scores systematically lower than a complete one. Callers rely on
//! that behaviour being exact.

use std::collections::BTreeMap;

use log::{info, warn};
use rayon::prelude::*;
use suitability_core::{Factor, Grid, GridSpec, NormalizedFactor, Preset};

use crate::ScoreError;

/// The normalized factor grids available to a run, all aligned with one
/// target grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorSet {
    target: GridSpec,
    factors: BTreeMap<Factor, NormalizedFactor>,
}

impl FactorSet {
    /// An empty set for grids shaped like `target`.
    #[must_use]
    pub const fn new(target: GridSpec) -> Self {
        Self {
            target,
            factors: BTreeMap::new(),
        }
    }

    /// Add a normalized factor, replacing any earlier grid for the same
    /// factor.
    ///
    /// # Errors
    /// Returns [`ScoreError::InputGridShapeMismatch`] when the grid is not
    /// aligned with the target; the set is left unchanged.
    pub fn insert(&mut self, factor: NormalizedFactor) -> Result<(), ScoreError> {
        factor
            .grid()
            .ensure_spec(&self.target, factor.factor().as_str())?;
        if let Some(previous) = self.factors.insert(factor.factor(), factor) {
            warn!("replaced normalized {} grid", previous.factor());
        }
        Ok(())
    }

    /// Drop a factor from the set, returning it.
    pub fn remove(&mut self, factor: Factor) -> Option<NormalizedFactor> {
        self.factors.remove(&factor)
    }

    /// The normalized grid for `factor`, if available.
    #[must_use]
    pub fn get(&self, factor: Factor) -> Option<&NormalizedFactor> {
        self.factors.get(&factor)
    }

    /// Available factors in canonical order.
    pub fn factors(&self) -> impl Iterator<Item = Factor> + '_ {
        self.factors.keys().copied()
    }

    /// The grid every member is aligned with.
    #[must_use]
    pub const fn target(&self) -> &GridSpec {
        &self.target
    }

    /// Number of available factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Report whether no factor is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Pre-quantization scores. `None` marks cells where no contributing factor
/// carried a real measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedGrid {
    grid: Grid<Option<f32>>,
}

impl CombinedGrid {
    pub(crate) const fn from_grid(grid: Grid<Option<f32>>) -> Self {
        Self { grid }
    }

    /// Shape and transform of the scores.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        self.grid.spec()
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<Option<f32>> {
        &self.grid
    }

    /// Row-major scores.
    #[must_use]
    pub fn cells(&self) -> &[Option<f32>] {
        self.grid.cells()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Option<f32>] {
        self.grid.cells_mut()
    }
}

/// One weighted factor taking part in a combination.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Contribution<'a> {
    pub(crate) weight: f32,
    pub(crate) scores: &'a NormalizedFactor,
}

/// Combines normalized factors with a preset's weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCombiner;

impl WeightedCombiner {
    /// Compute the weighted sum of the available factors for `preset`.
    ///
    /// # Errors
    /// Returns [`ScoreError::NoFactorsAvailable`] when none of the preset's
    /// weighted factors is in `factors`.
    pub fn combine(
        &self,
        preset: &Preset,
        factors: &FactorSet,
    ) -> Result<CombinedGrid, ScoreError> {
        let contributions = Self::contributions(preset, factors)?;
        for contribution in &contributions {
            info!(
                "preset {}: added {} with weight {}",
                preset.id(),
                contribution.scores.factor(),
                contribution.weight
            );
        }
        let cells: Vec<Option<f32>> = (0..factors.target().len())
            .into_par_iter()
            .map(|index| combine_cell(&contributions, index))
            .collect();
        let grid = Grid::new(*factors.target(), cells)?;
        Ok(CombinedGrid::from_grid(grid))
    }

    /// Pair each weighted factor of `preset` with its available grid, in the
    /// order the preset lists its weights.
    pub(crate) fn contributions<'a>(
        preset: &Preset,
        factors: &'a FactorSet,
    ) -> Result<Vec<Contribution<'a>>, ScoreError> {
        let contributions: Vec<Contribution<'a>> = preset
            .weights()
            .iter()
            .filter_map(|(factor, weight)| {
                let available = factors.get(factor);
                if available.is_none() {
                    warn!(
                        "preset {}: {factor} is unavailable and contributes nothing",
                        preset.id()
                    );
                }
                available.map(|scores| Contribution { weight, scores })
            })
            .collect();
        if contributions.is_empty() {
            return Err(ScoreError::NoFactorsAvailable {
                preset: preset.id().to_owned(),
            });
        }
        Ok(contributions)
    }
}

/// Weighted sum at one cell, or `None` when every contributing score was a
/// neutral substitute.
#[expect(
    clippy::float_arithmetic,
    reason = "the combined score is a weighted sum"
)]
pub(crate) fn combine_cell(contributions: &[Contribution<'_>], index: usize) -> Option<f32> {
    let mut sum = 0.0_f32;
    let mut measured_any = false;
    for contribution in contributions {
        let (score, measured) = contribution.scores.cell(index)?;
        sum += contribution.weight * score;
        measured_any |= measured;
    }
    measured_any.then_some(sum)
}
