//! Raster buffer errors.

use thiserror::Error;

/// Result alias for raster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a raster buffer was rejected.
#[derive(Debug, Error)]
pub enum Error {
    /// A pixel lookup fell outside the raster.
    #[error("pixel ({x}, {y}) lies outside the {width}x{height} raster")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Raster width.
        width: u32,
        /// Raster height.
        height: u32,
    },

    /// The raster has no pixels.
    #[error("raster {width}x{height} is empty")]
    Empty {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// Sample buffer disagrees with `width * height * channels`.
    #[error("raster holds {got} samples, its shape needs {expected}")]
    BufferSize {
        /// Samples the shape calls for.
        expected: usize,
        /// Samples actually stored.
        got: usize,
    },

    /// Only RGB and RGBA rasters carry color.
    #[error("{0}-channel raster; expected RGB or RGBA")]
    UnsupportedChannels(u32),
}

impl Error {
    /// `true` for [`Error::OutOfBounds`].
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_shape() {
        let err = Error::OutOfBounds { x: 100, y: 50, width: 80, height: 60 };
        assert!(err.to_string().contains("80x60"));
        assert!(err.is_bounds_error());

        let err = Error::Empty { width: 0, height: 10 };
        assert_eq!(err.to_string(), "raster 0x10 is empty");
        assert!(!err.is_bounds_error());
    }
}
