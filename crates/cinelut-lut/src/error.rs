//! Failures while building, writing or reading LUTs.

use thiserror::Error;

/// Result alias for this crate.
pub type LutResult<T> = Result<T, LutError>;

/// Why a LUT could not be produced or read back.
#[derive(Debug, Error)]
pub enum LutError {
    /// Grid size outside the accepted range.
    #[error("grid size {size} is outside {min}..={max}")]
    UnsupportedGridSize {
        /// Requested size.
        size: usize,
        /// Smallest accepted size.
        min: usize,
        /// Largest accepted size.
        max: usize,
    },

    /// Sample buffer does not hold `N^3` values.
    #[error("a lattice needs {expected} samples, got {got}")]
    SampleCount {
        /// `N^3` for the declared grid size.
        expected: usize,
        /// Samples supplied.
        got: usize,
    },

    /// Raster dimensions do not match the grid size.
    #[error("grid size {size} needs a {edge}x{edge} raster, got {width}x{height}")]
    RasterShape {
        /// Declared grid size.
        size: usize,
        /// Expected raster edge.
        edge: u32,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },

    /// `.cube` text has no `LUT_3D_SIZE` line.
    #[error("cube file declares no LUT_3D_SIZE")]
    MissingSize,

    /// A `.cube` line could not be understood.
    #[error("cube line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Raster buffer is malformed.
    #[error(transparent)]
    Image(#[from] cinelut_core::Error),

    /// Reading or writing the stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
