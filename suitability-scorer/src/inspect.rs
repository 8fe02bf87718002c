//! Per-cell explanation of a preset's score.

use std::fmt;

use suitability_core::Factor;

/// Qualitative band of a 0-100 suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuitabilityClass {
    /// Below 25.
    Poor,
    /// From 25 up to 50.
    Fair,
    /// From 50 up to 75.
    Good,
    /// 75 and above.
    Excellent,
}

impl SuitabilityClass {
    /// Classify a quantized score.
    ///
    /// # Examples
    /// ```
    /// use suitability_scorer::SuitabilityClass;
    ///
    /// assert_eq!(SuitabilityClass::from_score(24), SuitabilityClass::Poor);
    /// assert_eq!(SuitabilityClass::from_score(52), SuitabilityClass::Good);
    /// assert_eq!(SuitabilityClass::from_score(75), SuitabilityClass::Excellent);
    /// ```
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..25 => Self::Poor,
            25..50 => Self::Fair,
            50..75 => Self::Good,
            _ => Self::Excellent,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for SuitabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One factor's share of a cell's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorContribution {
    /// The factor.
    pub factor: Factor,
    /// Weight the preset gives the factor.
    pub weight: f32,
    /// Normalized score, or `None` when the factor grid is unavailable.
    pub score: Option<f32>,
    /// Whether the score came from a real measurement.
    pub measured: bool,
}

/// Explanation of one cell's score under one preset.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBreakdown {
    /// Identifier of the preset.
    pub preset: String,
    /// Row of the inspected cell.
    pub row: u32,
    /// Column of the inspected cell.
    pub col: u32,
    /// Contributions in the order the preset lists its weights.
    pub factors: Vec<FactorContribution>,
    /// Whether the exclusion mask forced the cell to zero.
    pub excluded: bool,
    /// Combined score before quantization.
    pub combined: Option<f32>,
    /// Quantized score, or `None` for an undefined cell.
    pub score: Option<u8>,
    /// Set when any weighted factor was unavailable or substituted.
    pub data_sparse: bool,
}

impl CellBreakdown {
    /// Band of the quantized score, if defined.
    #[must_use]
    pub fn class(&self) -> Option<SuitabilityClass> {
        self.score.map(SuitabilityClass::from_score)
    }
}
