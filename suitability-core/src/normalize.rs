//! Transfer functions mapping raw measurements onto `0.0..=1.0`.
//!
//! Every function is pure and clamps instead of extrapolating beyond its
//! stated domain. Arithmetic is single precision and evaluated in the same
//! operation order as the production raster pipeline so quantized outputs
//! match it exactly.

const SOLAR_FLOOR: f32 = 3.0;
const SOLAR_CEILING: f32 = 6.0;

const REMOTE_FLOOR_MINUTES: f32 = 30.0;
const REMOTE_CEILING_MINUTES: f32 = 180.0;

/// Upper bound (inclusive) of each water stress band and its score.
const WATER_BANDS: [(f32, f32); 4] = [(0.4, 1.0), (0.8, 0.7), (1.2, 0.4), (2.0, 0.2)];
const WATER_EXTREME: f32 = 0.05;

const POP_SPARSE: f32 = 5.0;
const POP_RURAL: f32 = 50.0;
const POP_DENSE: f32 = 200.0;
const POP_RURAL_SCORE: f32 = 0.3;

/// Linear ramp of global horizontal irradiation between 3 and 6 kWh/m²/day.
///
/// # Examples
/// ```
/// use suitability_core::normalize::normalize_solar;
///
/// assert_eq!(normalize_solar(2.0), 0.0);
/// assert_eq!(normalize_solar(4.5), 0.5);
/// assert_eq!(normalize_solar(7.0), 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "transfer functions are floating-point ramps"
)]
pub fn normalize_solar(ghi: f32) -> f32 {
    ((ghi - SOLAR_FLOOR) / (SOLAR_CEILING - SOLAR_FLOOR)).clamp(0.0, 1.0)
}

/// Step function over the water stress ratio with right-closed bands.
///
/// # Examples
/// ```
/// use suitability_core::normalize::normalize_water_stress;
///
/// assert_eq!(normalize_water_stress(0.4), 1.0);
/// assert_eq!(normalize_water_stress(0.41), 0.7);
/// assert_eq!(normalize_water_stress(2.5), 0.05);
/// ```
#[must_use]
pub fn normalize_water_stress(ratio: f32) -> f32 {
    WATER_BANDS
        .iter()
        .find(|(upper, _)| ratio <= *upper)
        .map_or(WATER_EXTREME, |(_, score)| *score)
}

/// Linear ramp of travel time to the nearest city between 30 and 180 minutes.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "transfer functions are floating-point ramps"
)]
pub fn normalize_remoteness(minutes: f32) -> f32 {
    ((minutes - REMOTE_FLOOR_MINUTES) / (REMOTE_CEILING_MINUTES - REMOTE_FLOOR_MINUTES))
        .clamp(0.0, 1.0)
}

/// Piecewise-linear score over population density.
///
/// Density up to 5/km² scores 1.0, falls linearly to 0.3 at 50/km² and to
/// 0.0 at 200/km², and stays at 0.0 beyond that. The function is continuous
/// at every breakpoint.
///
/// # Examples
/// ```
/// use suitability_core::normalize::normalize_population;
///
/// assert_eq!(normalize_population(5.0), 1.0);
/// assert!((normalize_population(125.0) - 0.15).abs() < 1e-6);
/// assert_eq!(normalize_population(500.0), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "piecewise interpolation needs floating-point maths"
)]
pub fn normalize_population(density: f32) -> f32 {
    if density <= POP_SPARSE {
        1.0
    } else if density <= POP_RURAL {
        1.0 - (1.0 - POP_RURAL_SCORE) * (density - POP_SPARSE) / (POP_RURAL - POP_SPARSE)
    } else if density <= POP_DENSE {
        POP_RURAL_SCORE - POP_RURAL_SCORE * (density - POP_RURAL) / (POP_DENSE - POP_RURAL)
    } else {
        0.0
    }
}

/// Inverted flood index, clamped to `0.0..=1.0` first.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "inversion is a subtraction")]
pub fn normalize_flood_risk(index: f32) -> f32 {
    1.0 - index.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const TOLERANCE: f32 = 1e-4;

    #[rstest]
    #[case(-10.0, 0.0)]
    #[case(3.0, 0.0)]
    #[case(4.5, 0.5)]
    #[case(6.0, 1.0)]
    #[case(9.0, 1.0)]
    fn solar_ramp(#[case] ghi: f32, #[case] expected: f32) {
        assert_eq!(normalize_solar(ghi), expected);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.4, 1.0)]
    #[case(0.41, 0.7)]
    #[case(0.8, 0.7)]
    #[case(0.9, 0.4)]
    #[case(1.2, 0.4)]
    #[case(1.21, 0.2)]
    #[case(2.0, 0.2)]
    #[case(2.01, 0.05)]
    #[case(3.0, 0.05)]
    fn water_bands_are_right_closed(#[case] ratio: f32, #[case] expected: f32) {
        assert_eq!(normalize_water_stress(ratio), expected);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(30.0, 0.0)]
    #[case(100.0, 0.466_7)]
    #[case(180.0, 1.0)]
    #[case(600.0, 1.0)]
    fn remoteness_ramp(#[case] minutes: f32, #[case] expected: f32) {
        let score = normalize_remoteness(minutes);
        assert!(
            (score - expected).abs() < TOLERANCE,
            "expected {expected}, got {score}"
        );
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(5.0, 1.0)]
    #[case(30.0, 0.611_1)]
    #[case(50.0, 0.3)]
    #[case(125.0, 0.15)]
    #[case(200.0, 0.0)]
    #[case(500.0, 0.0)]
    fn population_piecewise(#[case] density: f32, #[case] expected: f32) {
        let score = normalize_population(density);
        assert!(
            (score - expected).abs() < TOLERANCE,
            "expected {expected}, got {score}"
        );
    }

    #[rstest]
    #[case(-1.0, 1.0)]
    #[case(0.3, 0.7)]
    #[case(1.0, 0.0)]
    #[case(4.0, 0.0)]
    fn flood_inversion(#[case] index: f32, #[case] expected: f32) {
        assert_eq!(normalize_flood_risk(index), expected);
    }

    #[rstest]
    #[case(5.0)]
    #[case(50.0)]
    #[case(200.0)]
    fn population_is_continuous_at_breakpoints(#[case] breakpoint: f32) {
        let left = normalize_population(breakpoint - 1e-3);
        let right = normalize_population(breakpoint + 1e-3);
        assert!((left - right).abs() < 1e-3, "jump at {breakpoint}");
    }

    proptest! {
        #[test]
        fn every_transfer_stays_in_unit_range(raw in -1.0e6_f32..1.0e6_f32) {
            for score in [
                normalize_solar(raw),
                normalize_water_stress(raw),
                normalize_remoteness(raw),
                normalize_population(raw),
                normalize_flood_risk(raw),
            ] {
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }

        #[test]
        fn population_is_non_increasing(a in 0.0_f32..1_000.0, b in 0.0_f32..1_000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(normalize_population(low) >= normalize_population(high));
        }

        #[test]
        fn ramps_are_non_decreasing(a in -100.0_f32..400.0, b in -100.0_f32..400.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(normalize_solar(low) <= normalize_solar(high));
            prop_assert!(normalize_remoteness(low) <= normalize_remoteness(high));
            prop_assert!(normalize_water_stress(low) >= normalize_water_stress(high));
            prop_assert!(normalize_flood_risk(low) >= normalize_flood_risk(high));
        }
    }
}
