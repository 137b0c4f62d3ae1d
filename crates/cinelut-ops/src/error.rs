//! Errors from resampling and preview rendering.

use thiserror::Error;

/// Why an image operation could not run.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Sample buffer and stated shape disagree.
    #[error("{got} samples do not fill a {width}x{height}x{channels} buffer")]
    ShapeMismatch {
        /// Stated width.
        width: usize,
        /// Stated height.
        height: usize,
        /// Stated channel count.
        channels: usize,
        /// Samples provided.
        got: usize,
    },

    /// Source or target has a zero edge.
    #[error("cannot resample {src_w}x{src_h} to {dst_w}x{dst_h}")]
    ZeroSize {
        /// Source width.
        src_w: usize,
        /// Source height.
        src_h: usize,
        /// Target width.
        dst_w: usize,
        /// Target height.
        dst_h: usize,
    },

    /// An edge or width cap of zero.
    #[error("{0} must be at least 1 pixel")]
    ZeroLimit(&'static str),

    /// Source raster is malformed.
    #[error(transparent)]
    Image(#[from] cinelut_core::Error),
}

/// Result alias for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
