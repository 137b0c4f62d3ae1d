//! Failures while reading rasters or writing LUT files.

use crate::LutFormat;
use thiserror::Error;

/// Why a read, write or export did not complete.
#[derive(Debug, Error)]
pub enum IoError {
    /// The filesystem refused the operation.
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),

    /// Content or extension is neither PNG nor JPEG.
    #[error("not a PNG or JPEG image: {0}")]
    Unrecognized(String),

    /// A LUT format name nobody recognizes.
    #[error("unknown LUT format {0:?}")]
    UnknownLutFormat(String),

    /// A LUT format that is known but has no writer.
    #[error("{0} LUTs cannot be exported")]
    NotExportable(LutFormat),

    /// The codec rejected the input bytes.
    #[error("{codec} data is corrupt: {reason}")]
    Decode {
        /// Codec name.
        codec: &'static str,
        /// Codec message.
        reason: String,
    },

    /// The codec could not produce output.
    #[error("{codec} encoding failed: {reason}")]
    Encode {
        /// Codec name.
        codec: &'static str,
        /// Codec message.
        reason: String,
    },

    /// Pixel layout has no RGB mapping.
    #[error("cannot convert {0} pixels to RGB")]
    UnsupportedLayout(String),

    /// Export file name is unusable.
    #[error("cannot export as {0:?}")]
    InvalidName(String),

    /// LUT rendering failed.
    #[error(transparent)]
    Lut(#[from] cinelut_lut::LutError),

    /// Raster buffer is malformed.
    #[error(transparent)]
    Image(#[from] cinelut_core::Error),
}

impl IoError {
    pub(crate) fn decode(codec: &'static str, reason: impl ToString) -> Self {
        Self::Decode { codec, reason: reason.to_string() }
    }

    pub(crate) fn encode(codec: &'static str, reason: impl ToString) -> Self {
        Self::Encode { codec, reason: reason.to_string() }
    }
}

/// Result alias for this crate.
pub type IoResult<T> = Result<T, IoError>;
