//! Raster geometry shared by every grid in a scoring run.
//!
//! All grids taking part in one combination must share the same
//! [`GridSpec`]; the reprojection stage guarantees it for well-formed
//! inputs and the engine checks it before reading any cell.

use geo::{Coord, Rect};
use thiserror::Error;

/// Six-coefficient affine transform from cell indices to coordinates.
///
/// Coefficients follow the usual raster convention:
/// `x = c + a * col + b * row` and `y = f + d * col + e * row`, where
/// `(col, row)` addresses the upper-left corner of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTransform {
    /// Cell width along x.
    pub a: f64,
    /// Row rotation term.
    pub b: f64,
    /// X coordinate of the upper-left corner.
    pub c: f64,
    /// Column rotation term.
    pub d: f64,
    /// Cell height along y; negative for north-up rasters.
    pub e: f64,
    /// Y coordinate of the upper-left corner.
    pub f: f64,
}

impl GeoTransform {
    /// Build a north-up transform covering `bounds` with the given shape.
    ///
    /// # Examples
    /// ```
    /// use geo::{Coord, Rect};
    /// use suitability_core::GeoTransform;
    ///
    /// let bounds = Rect::new(Coord { x: -180.0, y: -90.0 }, Coord { x: 180.0, y: 90.0 });
    /// let transform = GeoTransform::from_bounds(bounds, 360, 180);
    /// assert_eq!(transform.a, 1.0);
    /// assert_eq!(transform.e, -1.0);
    /// assert_eq!((transform.c, transform.f), (-180.0, 90.0));
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cell size is the extent divided by the cell count"
    )]
    pub fn from_bounds(bounds: Rect<f64>, width: u32, height: u32) -> Self {
        let min = bounds.min();
        let max = bounds.max();
        Self {
            a: (max.x - min.x) / f64::from(width),
            b: 0.0,
            c: min.x,
            d: 0.0,
            e: (min.y - max.y) / f64::from(height),
            f: max.y,
        }
    }

    /// Coordinate of the upper-left corner of a cell.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "affine evaluation")]
    pub fn corner(&self, row: u32, col: u32) -> Coord<f64> {
        let col_f = f64::from(col);
        let row_f = f64::from(row);
        Coord {
            x: self.c + self.a * col_f + self.b * row_f,
            y: self.f + self.d * col_f + self.e * row_f,
        }
    }

    /// Coordinate of the centre of a cell.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "affine evaluation")]
    pub fn centre(&self, row: u32, col: u32) -> Coord<f64> {
        let col_f = f64::from(col) + 0.5;
        let row_f = f64::from(row) + 0.5;
        Coord {
            x: self.c + self.a * col_f + self.b * row_f,
            y: self.f + self.d * col_f + self.e * row_f,
        }
    }

    /// Fractional `(col, row)` position of a coordinate, or `None` when the
    /// transform is degenerate.
    #[expect(clippy::float_arithmetic, reason = "affine inversion")]
    fn invert(&self, coord: Coord<f64>) -> Option<(f64, f64)> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = coord.x - self.c;
        let dy = coord.y - self.f;
        let col = (self.e * dx - self.b * dy) / det;
        let row = (self.a * dy - self.d * dx) / det;
        Some((col, row))
    }
}

/// Shape and georeferencing of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    width: u32,
    height: u32,
    transform: GeoTransform,
}

impl GridSpec {
    /// Construct a spec from its shape and transform.
    ///
    /// # Errors
    /// Returns [`GridError::EmptyShape`] when either dimension is zero.
    pub const fn new(width: u32, height: u32, transform: GeoTransform) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyShape { width, height });
        }
        Ok(Self {
            width,
            height,
            transform,
        })
    }

    /// A spec with unit cells anchored at the origin, for small synthetic
    /// grids.
    ///
    /// Zero dimensions are raised to one.
    #[must_use]
    pub const fn unit(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
            transform: GeoTransform {
                a: 1.0,
                b: 0.0,
                c: 0.0,
                d: 0.0,
                e: -1.0,
                f: 0.0,
            },
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell-to-coordinate transform.
    #[must_use]
    pub const fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(u64::from(self.width) * u64::from(self.height)).unwrap_or(usize::MAX)
    }

    /// Always `false`; a spec cannot describe an empty grid.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Row-major index of `(row, col)`, if inside the grid.
    #[must_use]
    pub fn index(&self, row: u32, col: u32) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        usize::try_from(u64::from(row) * u64::from(self.width) + u64::from(col)).ok()
    }

    /// Locate the cell containing a lon/lat coordinate.
    ///
    /// Returns `(row, col)` or `None` when the coordinate lies outside.
    ///
    /// # Examples
    /// ```
    /// use geo::{Coord, Rect};
    /// use suitability_core::{GeoTransform, GridSpec};
    ///
    /// let bounds = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 4.0, y: 2.0 });
    /// let spec = GridSpec::new(4, 2, GeoTransform::from_bounds(bounds, 4, 2)).unwrap();
    /// assert_eq!(spec.cell_of(Coord { x: 2.5, y: 0.5 }), Some((1, 2)));
    /// assert_eq!(spec.cell_of(Coord { x: 5.0, y: 0.5 }), None);
    /// ```
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "fractional positions are range-checked before the cast"
    )]
    pub fn cell_of(&self, coord: Coord<f64>) -> Option<(u32, u32)> {
        let (col_pos, row_pos) = self.transform.invert(coord)?;
        let col = col_pos.floor();
        let row = row_pos.floor();
        let inside = (0.0..f64::from(self.width)).contains(&col)
            && (0.0..f64::from(self.height)).contains(&row);
        inside.then(|| (row as u32, col as u32))
    }
}

/// A rectangular, row-major array of cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    spec: GridSpec,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap row-major `cells` in a grid described by `spec`.
    ///
    /// # Errors
    /// Returns [`GridError::CellCount`] when the number of cells differs from
    /// `width * height`.
    pub fn new(spec: GridSpec, cells: Vec<T>) -> Result<Self, GridError> {
        if cells.len() != spec.len() {
            return Err(GridError::CellCount {
                expected: spec.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { spec, cells })
    }

    /// Wrap cells already known to match `spec`.
    pub(crate) fn from_parts(spec: GridSpec, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), spec.len());
        Self { spec, cells }
    }

    /// Build a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(spec: GridSpec, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            spec,
            cells: vec![value; spec.len()],
        }
    }

    /// Shape and transform of the grid.
    #[must_use]
    pub const fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Mutable row-major cells; the shape cannot change.
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Cell at `(row, col)`, if inside the grid.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<&T> {
        self.spec.index(row, col).and_then(|idx| self.cells.get(idx))
    }

    /// Apply `f` to every cell, keeping the spec.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            spec: self.spec,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Consume the grid and return its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }

    /// Check that this grid shares `expected`'s shape and transform.
    ///
    /// # Errors
    /// Returns [`GridError::ShapeMismatch`] naming `layer` otherwise.
    pub fn ensure_spec(&self, expected: &GridSpec, layer: &str) -> Result<(), GridError> {
        if self.spec == *expected {
            Ok(())
        } else {
            Err(GridError::ShapeMismatch {
                layer: layer.to_owned(),
                expected: Box::new(*expected),
                actual: Box::new(self.spec),
            })
        }
    }
}

/// Errors raised while building or aligning grids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A grid was declared with a zero dimension.
    #[error("grid dimensions must be positive (got {width}x{height})")]
    EmptyShape {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The cell buffer does not match the declared shape.
    #[error("expected {expected} cells but got {actual}")]
    CellCount {
        /// Cells implied by the spec.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },
    /// A layer is not aligned with the target grid.
    #[error("{layer} grid does not match the target grid (expected {expected:?}, found {actual:?})")]
    ShapeMismatch {
        /// Name of the offending layer.
        layer: String,
        /// Target spec.
        expected: Box<GridSpec>,
        /// Spec of the offending layer.
        actual: Box<GridSpec>,
    },
    /// An exclusion mask contained a value other than 0 or 1.
    #[error("exclusion mask cell {index} holds {value}; expected 0 or 1")]
    InvalidMaskValue {
        /// Row-major cell index.
        index: usize,
        /// Offending value.
        value: u8,
    },
    /// A nodata sentinel would be indistinguishable from a real score.
    #[error("nodata sentinel {nodata} collides with scores 0..={max}")]
    NodataCollision {
        /// Rejected sentinel.
        nodata: u8,
        /// Highest real score.
        max: u8,
    },
}
