//! Pipeline coverage for the scoring engine.

use geo::Coord;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use suitability_core::{
    EngineConfig, ExclusionMask, Factor, FactorGrid, Grid, GridSpec, Preset, PresetRegistry,
    WeightSet,
};

use crate::{FactorSet, ScoreError, SuitabilityClass, SuitabilityEngine};

const NODATA: f32 = -9999.0;

fn spec() -> GridSpec {
    GridSpec::unit(2, 2)
}

/// Raw values per factor for a 2x2 grid; the first cell is the reference
/// site used throughout the scoring documentation.
fn raw_inputs() -> Vec<FactorGrid> {
    let table: [(Factor, [f32; 4]); 5] = [
        (Factor::Solar, [4.5, 6.5, 2.0, NODATA]),
        (Factor::Water, [0.9, 0.2, 2.5, NODATA]),
        (Factor::Remoteness, [100.0, 240.0, 10.0, NODATA]),
        (Factor::Population, [30.0, 1.0, 900.0, NODATA]),
        (Factor::Flood, [0.3, 0.0, 1.0, NODATA]),
    ];
    table
        .into_iter()
        .map(|(factor, cells)| {
            FactorGrid::from_cells(factor, spec(), cells.to_vec(), Some(NODATA))
                .expect("valid factor grid")
        })
        .collect()
}

#[fixture]
fn engine() -> SuitabilityEngine {
    SuitabilityEngine::new(EngineConfig::new(spec()))
}

#[fixture]
fn registry() -> PresetRegistry {
    PresetRegistry::builtin().expect("builtin presets")
}

#[fixture]
fn factors(engine: SuitabilityEngine) -> FactorSet {
    let (set, rejected) = engine.normalize_all(&raw_inputs());
    assert!(rejected.is_empty());
    set
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "tolerance check")]
fn reference_site_scores_52_under_balanced_weights(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let preset = registry.get("A").expect("preset A");
    let combined = engine.combine(preset, &factors, None).expect("combined");
    let value = combined.cells()[0].expect("defined cell");
    assert!((value - 0.515).abs() < 1e-6, "combined {value}");

    let output = engine.score(preset, &factors, None).expect("scored");
    assert_eq!(output.score(0, 0), Some(52));
    assert_eq!(output.score(0, 1), Some(100));
    // Only the water band floor contributes: 0.25 * 0.05.
    assert_eq!(output.score(1, 0), Some(1));
    // Every factor is nodata in the last cell.
    assert_eq!(output.grid().cells()[3], 255);
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "linearity check")]
fn scaling_weights_scales_combined_scores(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let preset = registry.get("B").expect("preset B");
    let doubled = Preset::new(
        "B2",
        "Doubled",
        preset.weights().scaled("B2", 2.0).expect("scaled weights"),
    );
    let base = engine.combine(preset, &factors, None).expect("base");
    let scaled = engine.combine(&doubled, &factors, None).expect("scaled");
    for (lhs, rhs) in base.cells().iter().zip(scaled.cells()) {
        assert_eq!(lhs.map(|value| value * 2.0), *rhs);
    }
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "difference of weighted sums")]
fn omitted_factor_lowers_scores_by_its_weighted_term(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let preset = registry.get("A").expect("preset A");
    let mut partial = factors.clone();
    let flood = partial.remove(Factor::Flood).expect("flood present");
    let weight = preset.weights().weight(Factor::Flood).expect("flood weight");

    let full = engine.combine(preset, &factors, None).expect("full");
    let reduced = engine.combine(preset, &partial, None).expect("reduced");
    for (index, (with, without)) in full.cells().iter().zip(reduced.cells()).enumerate() {
        let (score, _) = flood.cell(index).expect("flood cell");
        match (with, without) {
            (Some(with), Some(without)) => assert_eq!(*with, without + weight * score),
            (None, None) => {}
            other => panic!("definedness changed at cell {index}: {other:?}"),
        }
    }
}

#[rstest]
fn excluded_cells_score_zero_and_undefined_cells_stay_undefined(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let mask = ExclusionMask::new(Grid::new(spec(), vec![0, 1, 1, 0]).expect("grid"))
        .expect("binary mask");
    let preset = registry.get("C").expect("preset C");
    let combined = engine
        .combine(preset, &factors, Some(&mask))
        .expect("combined");
    assert_eq!(combined.cells()[0], Some(0.0));
    assert_eq!(combined.cells()[3], None);

    let output = engine
        .score(preset, &factors, Some(&mask))
        .expect("scored");
    assert_eq!(output.grid().cells()[0], 0);
    assert_eq!(output.grid().cells()[3], 255);
}

#[rstest]
fn misaligned_mask_fails_the_preset(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let mask = ExclusionMask::all_eligible(GridSpec::unit(4, 1));
    let outcomes = engine.score_all(&registry, &factors, Some(&mask));
    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        let err = outcome.result().as_ref().expect_err("mask is misaligned");
        assert_eq!(err.kind(), "input_grid_shape_mismatch");
    }
}

#[rstest]
fn repeated_runs_are_identical(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let first = engine.score_all(&registry, &factors, None);
    let second = engine.score_all(&registry, &factors, None);
    for (lhs, rhs) in first.iter().zip(&second) {
        assert_eq!(lhs.preset(), rhs.preset());
        assert_eq!(
            lhs.result().as_ref().expect("first run"),
            rhs.result().as_ref().expect("second run")
        );
    }
}

#[rstest]
fn failing_presets_do_not_affect_others(engine: SuitabilityEngine, factors: FactorSet) {
    let mut only_solar = FactorSet::new(spec());
    only_solar
        .insert(factors.get(Factor::Solar).expect("solar").clone())
        .expect("aligned");
    let water_only = Preset::new(
        "W",
        "Water only",
        WeightSet::new("W", [(Factor::Water, 1.0)]).expect("weights"),
    );
    let sunny = Preset::new(
        "S",
        "Sunny",
        WeightSet::new("S", [(Factor::Solar, 1.0)]).expect("weights"),
    );
    let registry = PresetRegistry::new(vec![water_only, sunny]).expect("registry");

    let outcomes = engine.score_selected(&registry, &["W", "S", "Z"], &only_solar, None);
    let ids: Vec<&str> = outcomes.iter().map(|outcome| outcome.preset()).collect();
    assert_eq!(ids, vec!["W", "S", "Z"]);
    assert!(matches!(
        outcomes[0].result(),
        Err(ScoreError::NoFactorsAvailable { preset }) if preset == "W"
    ));
    assert_eq!(
        outcomes[1].result().as_ref().expect("sunny scores").score(0, 0),
        Some(50)
    );
    assert_eq!(
        outcomes[2].result().as_ref().expect_err("unknown").kind(),
        "configuration"
    );
}

#[rstest]
fn misaligned_raw_factors_are_dropped(engine: SuitabilityEngine) {
    let mut raws = raw_inputs();
    raws.push(
        FactorGrid::from_cells(Factor::Water, GridSpec::unit(3, 1), vec![0.1; 3], None)
            .expect("valid grid"),
    );
    raws.swap(1, 5);
    raws.truncate(5);
    let (set, rejected) = engine.normalize_all(&raws);
    assert_eq!(rejected.len(), 1);
    assert!(set.get(Factor::Water).is_none());
    assert_eq!(set.len(), 4);
}

#[rstest]
fn inspection_explains_the_reference_site(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    factors: FactorSet,
) {
    let preset = registry.get("A").expect("preset A");
    let breakdown = engine
        .inspect(preset, &factors, None, Coord { x: 0.5, y: -0.5 })
        .expect("inspection")
        .expect("inside the grid");
    assert_eq!((breakdown.row, breakdown.col), (0, 0));
    assert_eq!(breakdown.score, Some(52));
    assert_eq!(breakdown.class(), Some(SuitabilityClass::Good));
    assert!(!breakdown.data_sparse);
    assert_eq!(breakdown.factors.len(), 5);
    assert_eq!(breakdown.factors[1].score, Some(0.4));
}

#[rstest]
fn inspection_flags_sparse_cells(
    engine: SuitabilityEngine,
    registry: PresetRegistry,
    mut factors: FactorSet,
) {
    factors.remove(Factor::Water);
    let preset = registry.get("A").expect("preset A");
    let breakdown = engine
        .inspect(preset, &factors, None, Coord { x: 1.5, y: -0.5 })
        .expect("inspection")
        .expect("inside the grid");
    assert!(breakdown.data_sparse);
    assert_eq!(breakdown.factors[1].score, None);

    let outside = engine
        .inspect(preset, &factors, None, Coord { x: 7.0, y: 7.0 })
        .expect("inspection");
    assert!(outside.is_none());
}

proptest! {
    #[test]
    fn scores_stay_in_range_or_nodata(
        cells in proptest::collection::vec(-50.0_f32..1000.0, 4),
        mask_bits in proptest::collection::vec(0_u8..=1, 4),
    ) {
        let engine = SuitabilityEngine::new(EngineConfig::new(spec()));
        let raws: Vec<FactorGrid> = Factor::ALL
            .into_iter()
            .map(|factor| {
                FactorGrid::from_cells(factor, spec(), cells.clone(), None).expect("valid grid")
            })
            .collect();
        let (set, _) = engine.normalize_all(&raws);
        let mask = ExclusionMask::new(Grid::new(spec(), mask_bits.clone()).expect("grid"))
            .expect("binary mask");
        let registry = PresetRegistry::builtin().expect("builtin presets");
        for outcome in engine.score_all(&registry, &set, Some(&mask)) {
            let output = outcome.result().as_ref().expect("scored");
            for (value, bit) in output.grid().cells().iter().zip(&mask_bits) {
                prop_assert!(*value <= 100);
                if *bit == 0 {
                    prop_assert_eq!(*value, 0);
                }
            }
        }
    }
}
