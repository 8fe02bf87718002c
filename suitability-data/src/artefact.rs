//! Single-band raster artefacts encoded with `bincode`.

use std::io::{self, BufReader};

use bincode::Options;
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use suitability_core::{ExclusionMask, Factor, FactorGrid, Grid, GridError, GridSpec};
use suitability_fs::{open_utf8_file, write_atomic};
use thiserror::Error;

/// File extension of raster artefacts.
pub const ARTEFACT_EXTENSION: &str = "grid";

/// Bincode configuration shared by every raster artefact.
pub(crate) fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
}

/// A single-band raster with an optional declared nodata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster<T> {
    /// The cells and their georeferencing.
    pub grid: Grid<T>,
    /// Value marking cells without a measurement.
    pub nodata: Option<T>,
}

impl<T> Raster<T> {
    /// Wrap a grid and its nodata value.
    #[must_use]
    pub const fn new(grid: Grid<T>, nodata: Option<T>) -> Self {
        Self { grid, nodata }
    }
}

impl Raster<f32> {
    /// Interpret the raster as raw measurements of `factor`.
    #[must_use]
    pub fn into_factor(self, factor: Factor) -> FactorGrid {
        FactorGrid::new(factor, self.grid, self.nodata)
    }
}

impl Raster<u8> {
    /// Interpret the raster as an exclusion mask.
    ///
    /// Nodata cells are treated as eligible.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidMaskValue`] when a defined cell holds
    /// anything other than 0 or 1.
    pub fn into_mask(self) -> Result<ExclusionMask, GridError> {
        let nodata = self.nodata;
        let grid = match nodata {
            Some(sentinel) => self
                .grid
                .map(|value| if *value == sentinel { 1 } else { *value }),
            None => self.grid,
        };
        ExclusionMask::new(grid)
    }
}

/// Errors raised while reading or writing raster artefacts.
#[derive(Debug, Error)]
pub enum ArtefactError {
    /// Opening or reading the artefact failed.
    #[error("failed to read raster artefact at {path}")]
    Read {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// The artefact bytes are not a valid raster.
    #[error("failed to decode raster artefact at {path}")]
    Decode {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The decoded raster is internally inconsistent.
    #[error("raster artefact at {path} is inconsistent")]
    InvalidGrid {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: GridError,
    },
    /// Creating, writing or renaming the artefact failed.
    #[error("failed to write raster artefact at {path}")]
    Write {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// Encoding the raster failed.
    #[error("failed to encode raster artefact for {path}")]
    Encode {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
}

impl ArtefactError {
    /// Path of the artefact concerned.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. }
            | Self::Decode { path, .. }
            | Self::InvalidGrid { path, .. }
            | Self::Write { path, .. }
            | Self::Encode { path, .. } => path,
        }
    }
}

/// Read a raster artefact and check its cell count against its spec.
///
/// # Errors
/// Returns [`ArtefactError`] when the file cannot be read or decoded.
pub fn read_raster<T>(path: &Utf8Path) -> Result<Raster<T>, ArtefactError>
where
    T: DeserializeOwned,
{
    let file = open_utf8_file(path).map_err(|source| ArtefactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Raster<T> = bincode_options()
        .deserialize_from(BufReader::new(file))
        .map_err(|source| ArtefactError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let spec = *raw.grid.spec();
    let grid = Grid::new(spec, raw.grid.into_cells()).map_err(|source| {
        ArtefactError::InvalidGrid {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Raster::new(grid, raw.nodata))
}

/// Read only the grid spec at the head of a raster artefact.
///
/// The cells are not decoded, so this is cheap even for global rasters.
///
/// # Errors
/// Returns [`ArtefactError`] when the file cannot be read or its header
/// cannot be decoded.
pub fn read_raster_spec(path: &Utf8Path) -> Result<GridSpec, ArtefactError> {
    let file = open_utf8_file(path).map_err(|source| ArtefactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    bincode_options()
        .deserialize_from(BufReader::new(file))
        .map_err(|source| ArtefactError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

enum WriteFailure {
    Io(io::Error),
    Encode(bincode::Error),
}

impl From<io::Error> for WriteFailure {
    fn from(source: io::Error) -> Self {
        Self::Io(source)
    }
}

/// Write a raster artefact, replacing any existing file atomically.
///
/// # Errors
/// Returns [`ArtefactError::Write`] or [`ArtefactError::Encode`]; the
/// previous artefact, if any, is left in place.
pub fn write_raster<T>(path: &Utf8Path, raster: &Raster<T>) -> Result<(), ArtefactError>
where
    T: Serialize,
{
    write_atomic(path, |writer| {
        bincode_options()
            .serialize_into(writer, raster)
            .map_err(WriteFailure::Encode)
    })
    .map_err(|failure| match failure {
        WriteFailure::Io(source) => ArtefactError::Write {
            path: path.to_path_buf(),
            source,
        },
        WriteFailure::Encode(source) => ArtefactError::Encode {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use suitability_core::GridSpec;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn path_in(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path")
    }

    #[rstest]
    fn rasters_survive_a_write_and_read(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "processed/solar_ghi.grid");
        let grid = Grid::new(GridSpec::unit(3, 1), vec![4.5, -9999.0, 6.0]).expect("grid");
        write_raster(&path, &Raster::new(grid.clone(), Some(-9999.0))).expect("write");

        let raster: Raster<f32> = read_raster(&path).expect("read");
        assert_eq!(raster.grid, grid);
        let factor = raster.into_factor(Factor::Solar);
        assert!(!factor.is_measured(-9999.0));
    }

    #[rstest]
    fn specs_are_read_without_the_cells(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "mask.grid");
        let spec = GridSpec::unit(2, 3);
        let grid = Grid::new(spec, vec![0_u8; 6]).expect("grid");
        write_raster(&path, &Raster::new(grid, None)).expect("write");
        assert_eq!(read_raster_spec(&path).expect("header"), spec);
    }

    #[rstest]
    fn missing_artefacts_fail_to_read(temp_dir: TempDir) {
        let err = read_raster::<f32>(&path_in(&temp_dir, "absent.grid")).expect_err("absent");
        assert!(matches!(err, ArtefactError::Read { .. }));
        assert!(err.path().as_str().ends_with("absent.grid"));
    }

    #[rstest]
    fn corrupt_artefacts_fail_to_decode(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "corrupt.grid");
        std::fs::File::create(path.as_std_path())
            .and_then(|mut file| file.write_all(b"\x01"))
            .expect("write corrupt bytes");
        let err = read_raster::<f32>(&path).expect_err("corrupt");
        assert!(matches!(err, ArtefactError::Decode { .. }));
    }

    #[rstest]
    fn inconsistent_cell_counts_are_rejected(temp_dir: TempDir) {
        #[derive(Serialize)]
        struct Forged {
            spec: GridSpec,
            cells: Vec<u8>,
        }
        let path = path_in(&temp_dir, "forged.grid");
        let forged = (
            Forged {
                spec: GridSpec::unit(2, 2),
                cells: vec![1, 0],
            },
            None::<u8>,
        );
        let bytes = bincode_options().serialize(&forged).expect("encode");
        std::fs::write(path.as_std_path(), bytes).expect("write forged raster");
        let err = read_raster::<u8>(&path).expect_err("short buffer");
        assert!(matches!(err, ArtefactError::InvalidGrid { .. }));
    }

    #[rstest]
    #[case(None, vec![1, 0, 1])]
    #[case(Some(255), vec![1, 0, 255])]
    fn masks_accept_binary_cells_and_nodata(#[case] nodata: Option<u8>, #[case] cells: Vec<u8>) {
        let grid = Grid::new(GridSpec::unit(3, 1), cells).expect("grid");
        let mask = Raster::new(grid, nodata).into_mask().expect("valid mask");
        assert_eq!(mask.excluded_count(), 1);
        assert!(!mask.is_excluded(2));
    }

    #[rstest]
    fn masks_reject_other_values() {
        let grid = Grid::new(GridSpec::unit(2, 1), vec![1, 7]).expect("grid");
        let err = Raster::new(grid, None).into_mask().expect_err("7 is not binary");
        assert_eq!(err, GridError::InvalidMaskValue { index: 1, value: 7 });
    }
}
