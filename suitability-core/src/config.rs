//! Immutable engine parameters.
//!
//! Everything the raster pipeline treats as a process-wide constant lives on
//! [`EngineConfig`], which is passed to the engine at construction so runs
//! with different parameters never interfere.

use geo::{Coord, Rect};

use crate::{GeoTransform, GridError, GridSpec, MissingDataPolicy};

/// EPSG code of the WGS84 geographic reference used by every grid.
pub const WGS84_EPSG: u32 = 4326;
/// Cell size of the production grid in degrees (about 1 km at the equator).
pub const GLOBAL_RESOLUTION_DEGREES: f64 = 0.008_333;
/// Neutral normalized score substituted for missing measurements.
pub const NEUTRAL_SCORE: f32 = 0.6;
/// Output value reserved for undefined cells.
pub const NODATA_SCORE: u8 = 255;
/// Highest stored suitability score.
pub const MAX_SCORE: u8 = 100;

/// Parameters shared by every stage of a scoring run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    target: GridSpec,
    epsg: u32,
    missing_data: MissingDataPolicy,
    nodata: u8,
}

impl EngineConfig {
    /// Configuration for an arbitrary target grid with production defaults.
    #[must_use]
    pub fn new(target: GridSpec) -> Self {
        Self {
            target,
            epsg: WGS84_EPSG,
            missing_data: MissingDataPolicy::new(NEUTRAL_SCORE),
            nodata: NODATA_SCORE,
        }
    }

    /// The production configuration: a global WGS84 grid at
    /// [`GLOBAL_RESOLUTION_DEGREES`].
    ///
    /// The cell counts truncate `extent / resolution`, giving 43201 columns
    /// and 21600 rows.
    ///
    /// # Errors
    /// Propagates [`GridError`] if the derived shape is empty.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::EngineConfig;
    ///
    /// let config = EngineConfig::global().unwrap();
    /// assert_eq!(config.target().width(), 43_201);
    /// assert_eq!(config.target().height(), 21_600);
    /// ```
    pub fn global() -> Result<Self, GridError> {
        let bounds = Rect::new(Coord { x: -180.0, y: -90.0 }, Coord { x: 180.0, y: 90.0 });
        let target = Self::spec_for_bounds(bounds, GLOBAL_RESOLUTION_DEGREES)?;
        Ok(Self::new(target))
    }

    /// Derive a grid spec covering `bounds` at `resolution` degrees per cell.
    ///
    /// # Errors
    /// Returns [`GridError::EmptyShape`] when the bounds are narrower than a
    /// single cell.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "cell counts truncate the extent divided by the resolution"
    )]
    pub fn spec_for_bounds(bounds: Rect<f64>, resolution: f64) -> Result<GridSpec, GridError> {
        let width = (bounds.width() / resolution) as u32;
        let height = (bounds.height() / resolution) as u32;
        GridSpec::new(width, height, GeoTransform::from_bounds(bounds, width, height))
    }

    /// Replace the missing-data policy.
    #[must_use]
    pub const fn with_missing_data(mut self, policy: MissingDataPolicy) -> Self {
        self.missing_data = policy;
        self
    }

    /// Replace the sentinel written for undefined cells.
    ///
    /// # Errors
    /// Returns [`GridError::NodataCollision`] when `nodata` is a valid score,
    /// that is at most [`MAX_SCORE`].
    pub const fn with_nodata(mut self, nodata: u8) -> Result<Self, GridError> {
        if nodata <= MAX_SCORE {
            return Err(GridError::NodataCollision {
                nodata,
                max: MAX_SCORE,
            });
        }
        self.nodata = nodata;
        Ok(self)
    }

    /// Grid every input must match.
    #[must_use]
    pub const fn target(&self) -> &GridSpec {
        &self.target
    }

    /// EPSG code of the coordinate reference.
    #[must_use]
    pub const fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Policy applied to unmeasured cells.
    #[must_use]
    pub const fn missing_data(&self) -> MissingDataPolicy {
        self.missing_data
    }

    /// Sentinel written for undefined cells.
    #[must_use]
    pub const fn nodata(&self) -> u8 {
        self.nodata
    }
}
