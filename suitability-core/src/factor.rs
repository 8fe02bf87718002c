//! Factors describing the raw measurement layers that feed the score.
//!
//! The enum is the closed dispatch table from factor name to transfer
//! function, so lookups never go through strings at scoring time.
//!
//! # Examples
//! ```
//! use suitability_core::Factor;
//!
//! assert_eq!(Factor::Population.as_str(), "population");
//! assert_eq!(Factor::Population.artefact_stem(), "pop_density");
//! assert_eq!("flood".parse::<Factor>(), Ok(Factor::Flood));
//! ```

use crate::normalize::{
    normalize_flood_risk, normalize_population, normalize_remoteness, normalize_solar,
    normalize_water_stress,
};
use crate::{Grid, GridError, GridSpec};

/// One raw geospatial measurement layer.
///
/// The derived ordering follows [`Factor::ALL`], which is also the order in
/// which factors are accumulated during combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Factor {
    /// Global horizontal irradiation in kWh/m²/day.
    Solar,
    /// Baseline water stress ratio.
    Water,
    /// Travel time to the nearest city in minutes.
    Remoteness,
    /// Population density in people per km².
    Population,
    /// Flood hazard index in `0.0..=1.0`.
    Flood,
}

impl Factor {
    /// Every factor in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Solar,
        Self::Water,
        Self::Remoteness,
        Self::Population,
        Self::Flood,
    ];

    /// Return the factor name used in preset documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Water => "water",
            Self::Remoteness => "remoteness",
            Self::Population => "population",
            Self::Flood => "flood",
        }
    }

    /// Return the file stem the ingestion stage uses for this factor.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::Factor;
    ///
    /// assert_eq!(Factor::Remoteness.artefact_stem(), "travel_time");
    /// ```
    #[must_use]
    pub const fn artefact_stem(self) -> &'static str {
        match self {
            Self::Solar => "solar_ghi",
            Self::Water => "water_stress",
            Self::Remoteness => "travel_time",
            Self::Population => "pop_density",
            Self::Flood => "flood_risk",
        }
    }

    /// Map a raw measurement onto the `0.0..=1.0` desirability scale.
    ///
    /// # Examples
    /// ```
    /// use suitability_core::Factor;
    ///
    /// assert_eq!(Factor::Solar.normalize(4.5), 0.5);
    /// assert_eq!(Factor::Water.normalize(3.0), 0.05);
    /// ```
    #[must_use]
    pub fn normalize(self, raw: f32) -> f32 {
        match self {
            Self::Solar => normalize_solar(raw),
            Self::Water => normalize_water_stress(raw),
            Self::Remoteness => normalize_remoteness(raw),
            Self::Population => normalize_population(raw),
            Self::Flood => normalize_flood_risk(raw),
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown factor name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown factor '{name}'")]
pub struct UnknownFactor {
    /// The rejected name.
    pub name: String,
}

impl std::str::FromStr for Factor {
    type Err = UnknownFactor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|factor| factor.as_str() == s)
            .ok_or_else(|| UnknownFactor { name: s.to_owned() })
    }
}

/// A grid of raw measurements for one factor plus its declared nodata value.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorGrid {
    factor: Factor,
    grid: Grid<f32>,
    nodata: Option<f32>,
}

impl FactorGrid {
    /// Wrap a raw grid for `factor`.
    #[must_use]
    pub const fn new(factor: Factor, grid: Grid<f32>, nodata: Option<f32>) -> Self {
        Self {
            factor,
            grid,
            nodata,
        }
    }

    /// Build a factor grid from a spec and row-major cells.
    ///
    /// # Errors
    /// Returns [`GridError::CellCount`] when `cells` does not match the spec.
    pub fn from_cells(
        factor: Factor,
        spec: GridSpec,
        cells: Vec<f32>,
        nodata: Option<f32>,
    ) -> Result<Self, GridError> {
        Ok(Self::new(factor, Grid::new(spec, cells)?, nodata))
    }

    /// The factor this grid measures.
    #[must_use]
    pub const fn factor(&self) -> Factor {
        self.factor
    }

    /// The raw measurement grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<f32> {
        &self.grid
    }

    /// The declared nodata sentinel, if the source declares one.
    #[must_use]
    pub const fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    /// Report whether a raw value is a real measurement.
    ///
    /// NaN is never a measurement, whatever the declared sentinel.
    #[must_use]
    pub fn is_measured(&self, raw: f32) -> bool {
        if raw.is_nan() {
            return false;
        }
        self.nodata.is_none_or(|nodata| raw != nodata)
    }
}
