//! Exclusion of protected cells from combined scores.

use log::info;
use rayon::prelude::*;
use suitability_core::ExclusionMask;

use crate::{CombinedGrid, ScoreError};

impl CombinedGrid {
    /// Force excluded cells to a score of exactly zero.
    ///
    /// Eligible cells are left untouched, as are undefined cells, which stay
    /// undefined whatever the mask says.
    ///
    /// # Errors
    /// Returns [`ScoreError::InputGridShapeMismatch`] when the mask is not
    /// aligned with the scores; the scores are left unchanged.
    pub fn apply_mask(&mut self, mask: &ExclusionMask) -> Result<(), ScoreError> {
        mask.ensure_spec(self.spec())?;
        info!(
            "applying exclusion mask ({} excluded cells)",
            mask.excluded_count()
        );
        self.cells_mut()
            .par_iter_mut()
            .enumerate()
            .filter(|(index, _)| mask.is_excluded(*index))
            .for_each(|(_, cell)| {
                if let Some(score) = cell.as_mut() {
                    *score = 0.0;
                }
            });
        Ok(())
    }
}
