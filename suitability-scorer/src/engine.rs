//! The per-preset scoring pipeline.
//!
//! `normalize -> combine -> mask -> quantize`, with the normalized factor
//! set shared read-only between presets so each preset is an independent
//! task.

use geo::Coord;
use log::{info, warn};
use rayon::prelude::*;
use suitability_core::{
    EngineConfig, ExclusionMask, FactorGrid, GridError, NormalizedFactor, Preset, PresetRegistry,
};

use crate::combine::combine_cell;
use crate::inspect::FactorContribution;
use crate::{
    CellBreakdown, CombinedGrid, FactorSet, Quantizer, ScoreError, SuitabilityGrid,
    WeightedCombiner,
};

/// Result of scoring one preset within a multi-preset run.
#[derive(Debug)]
pub struct PresetOutcome {
    preset: String,
    result: Result<SuitabilityGrid, ScoreError>,
}

impl PresetOutcome {
    /// Identifier of the preset.
    #[must_use]
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// The preset's output or the reason it failed.
    #[must_use]
    pub const fn result(&self) -> &Result<SuitabilityGrid, ScoreError> {
        &self.result
    }

    /// Consume the outcome.
    #[must_use]
    pub fn into_parts(self) -> (String, Result<SuitabilityGrid, ScoreError>) {
        (self.preset, self.result)
    }
}

/// Scores presets over one target grid.
#[derive(Debug, Clone, Copy)]
pub struct SuitabilityEngine {
    config: EngineConfig,
    combiner: WeightedCombiner,
    quantizer: Quantizer,
}

impl SuitabilityEngine {
    /// Build an engine for `config`.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            combiner: WeightedCombiner,
            quantizer: Quantizer::for_config(&config),
        }
    }

    /// Parameters of this engine.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Normalize one raw factor grid under the configured missing-data
    /// policy.
    ///
    /// # Errors
    /// Returns [`ScoreError::InputGridShapeMismatch`] when the grid is not
    /// aligned with the target.
    pub fn normalize(&self, raw: &FactorGrid) -> Result<NormalizedFactor, ScoreError> {
        raw.grid()
            .ensure_spec(self.config.target(), raw.factor().as_str())?;
        let normalized = self.config.missing_data().apply(raw);
        let substituted = normalized
            .measured()
            .iter()
            .filter(|measured| !**measured)
            .count();
        info!(
            "normalized {} ({substituted} cells set to the neutral score)",
            raw.factor()
        );
        Ok(normalized)
    }

    /// Normalize every available factor in parallel.
    ///
    /// Misaligned factors are dropped with a warning and returned alongside
    /// the usable set, which then scores as if they were absent.
    #[must_use]
    pub fn normalize_all(&self, raws: &[FactorGrid]) -> (FactorSet, Vec<ScoreError>) {
        let results: Vec<Result<NormalizedFactor, ScoreError>> =
            raws.par_iter().map(|raw| self.normalize(raw)).collect();
        let mut set = FactorSet::new(*self.config.target());
        let mut rejected = Vec::new();
        for result in results {
            match result.and_then(|normalized| set.insert(normalized)) {
                Ok(()) => {}
                Err(err) => {
                    warn!("dropping factor: {err}");
                    rejected.push(err);
                }
            }
        }
        (set, rejected)
    }

    /// Combine and mask the factors for `preset`, without quantizing.
    ///
    /// # Errors
    /// Returns [`ScoreError::InputGridShapeMismatch`] when the factors or
    /// the mask are not aligned with the target, and
    /// [`ScoreError::NoFactorsAvailable`] when nothing can be combined.
    pub fn combine(
        &self,
        preset: &Preset,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Result<CombinedGrid, ScoreError> {
        self.check_inputs(factors, mask)?;
        let mut combined = self.combiner.combine(preset, factors)?;
        if let Some(exclusion) = mask {
            combined.apply_mask(exclusion)?;
        }
        Ok(combined)
    }

    /// Run the full pipeline for one preset.
    ///
    /// # Errors
    /// As for [`SuitabilityEngine::combine`].
    ///
    /// # Examples
    /// ```
    /// use suitability_core::{EngineConfig, Factor, FactorGrid, GridSpec, PresetRegistry};
    /// use suitability_scorer::SuitabilityEngine;
    ///
    /// let spec = GridSpec::unit(1, 1);
    /// let engine = SuitabilityEngine::new(EngineConfig::new(spec));
    /// let raws: Vec<FactorGrid> = Factor::ALL
    ///     .into_iter()
    ///     .zip([4.5, 0.9, 100.0, 30.0, 0.3])
    ///     .map(|(factor, value)| FactorGrid::from_cells(factor, spec, vec![value], None).unwrap())
    ///     .collect();
    /// let (factors, _) = engine.normalize_all(&raws);
    /// let registry = PresetRegistry::builtin().unwrap();
    /// let output = engine.score(registry.get("A").unwrap(), &factors, None).unwrap();
    /// assert_eq!(output.score(0, 0), Some(52));
    /// ```
    pub fn score(
        &self,
        preset: &Preset,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Result<SuitabilityGrid, ScoreError> {
        let combined = self.combine(preset, factors, mask)?;
        Ok(self.quantizer.quantize(&combined))
    }

    /// Look `id` up in `registry` and score it.
    ///
    /// # Errors
    /// Returns [`ScoreError::Configuration`] for an unknown id, otherwise as
    /// for [`SuitabilityEngine::score`].
    pub fn score_preset(
        &self,
        registry: &PresetRegistry,
        id: &str,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Result<SuitabilityGrid, ScoreError> {
        self.score(registry.get(id)?, factors, mask)
    }

    /// Score every preset in `registry`, in parallel and in registry order.
    ///
    /// A failing preset does not affect the others.
    #[must_use]
    pub fn score_all(
        &self,
        registry: &PresetRegistry,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Vec<PresetOutcome> {
        let ids: Vec<&str> = registry.ids().collect();
        self.score_selected(registry, &ids, factors, mask)
    }

    /// Score the presets named by `ids`, in parallel and in the given
    /// order. Unknown ids fail individually with a configuration error.
    #[must_use]
    pub fn score_selected<S>(
        &self,
        registry: &PresetRegistry,
        ids: &[S],
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Vec<PresetOutcome>
    where
        S: AsRef<str> + Sync,
    {
        ids.par_iter()
            .map(|requested| {
                let id = requested.as_ref();
                let result = self.score_preset(registry, id, factors, mask);
                match &result {
                    Ok(_) => info!("scored preset {id}"),
                    Err(err) => warn!("preset {id} failed: {err}"),
                }
                PresetOutcome {
                    preset: id.to_owned(),
                    result,
                }
            })
            .collect()
    }

    /// Explain the score of the cell containing `coord`.
    ///
    /// Returns `Ok(None)` when the coordinate lies outside the target grid.
    ///
    /// # Errors
    /// As for [`SuitabilityEngine::combine`].
    pub fn inspect(
        &self,
        preset: &Preset,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
        coord: Coord<f64>,
    ) -> Result<Option<CellBreakdown>, ScoreError> {
        self.check_inputs(factors, mask)?;
        let target = self.config.target();
        let Some((row, col)) = target.cell_of(coord) else {
            return Ok(None);
        };
        let Some(index) = target.index(row, col) else {
            return Ok(None);
        };
        let contributions = WeightedCombiner::contributions(preset, factors)?;
        let excluded = mask.is_some_and(|exclusion| exclusion.is_excluded(index));
        let combined =
            combine_cell(&contributions, index).map(|sum| if excluded { 0.0 } else { sum });

        let breakdown: Vec<FactorContribution> = preset
            .weights()
            .iter()
            .map(|(factor, weight)| {
                let cell = factors.get(factor).and_then(|grid| grid.cell(index));
                FactorContribution {
                    factor,
                    weight,
                    score: cell.map(|(score, _)| score),
                    measured: cell.is_some_and(|(_, measured)| measured),
                }
            })
            .collect();
        let data_sparse = breakdown.iter().any(|contribution| !contribution.measured);
        let score = combined
            .filter(|value| value.is_finite())
            .map(|value| self.quantizer.quantize_score(Some(value)));

        Ok(Some(CellBreakdown {
            preset: preset.id().to_owned(),
            row,
            col,
            factors: breakdown,
            excluded,
            combined,
            score,
            data_sparse,
        }))
    }

    fn check_inputs(
        &self,
        factors: &FactorSet,
        mask: Option<&ExclusionMask>,
    ) -> Result<(), ScoreError> {
        let target = self.config.target();
        if factors.target() != target {
            return Err(ScoreError::InputGridShapeMismatch {
                source: GridError::ShapeMismatch {
                    layer: "factor set".to_owned(),
                    expected: Box::new(*target),
                    actual: Box::new(*factors.target()),
                },
            });
        }
        if let Some(exclusion) = mask {
            exclusion.ensure_spec(target)?;
        }
        Ok(())
    }
}
