//! Binary eligibility grid for categorical exclusions such as protected
//! areas.

use crate::{Grid, GridError, GridSpec};

/// Cells holding `0` are excluded whatever their factor scores; cells
/// holding `1` are eligible.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionMask {
    grid: Grid<u8>,
}

impl ExclusionMask {
    /// Validate a `{0, 1}` grid as a mask.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidMaskValue`] for the first cell holding any
    /// other value.
    pub fn new(grid: Grid<u8>) -> Result<Self, GridError> {
        if let Some((index, &value)) = grid
            .cells()
            .iter()
            .enumerate()
            .find(|(_, value)| **value > 1)
        {
            return Err(GridError::InvalidMaskValue { index, value });
        }
        Ok(Self { grid })
    }

    /// A mask excluding nothing.
    #[must_use]
    pub fn all_eligible(spec: GridSpec) -> Self {
        Self {
            grid: Grid::filled(spec, 1),
        }
    }

    /// Shape and transform of the mask.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        self.grid.spec()
    }

    /// Report whether the cell at a row-major index is excluded.
    ///
    /// Indices outside the grid are treated as eligible.
    #[must_use]
    pub fn is_excluded(&self, index: usize) -> bool {
        self.grid.cells().get(index).is_some_and(|value| *value == 0)
    }

    /// Number of excluded cells.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.grid.cells().iter().filter(|value| **value == 0).count()
    }

    /// Check that the mask is aligned with `target`.
    ///
    /// # Errors
    /// Returns [`GridError::ShapeMismatch`] otherwise.
    pub fn ensure_spec(&self, target: &GridSpec) -> Result<(), GridError> {
        self.grid.ensure_spec(target, "exclusion mask")
    }
}
