//! Interleaved raster buffers.
//!
//! [`ImageData`] is the one image container used across cinelut: decoded
//! source frames, the test chart, preview output and Hald LUT rasters.
//!
//! Samples run row by row from the top, channels interleaved:
//!
//! ```text
//! [R G B R G B R G B ...]  <- Row 0
//! [R G B R G B R G B ...]  <- Row 1
//! ```
//!
//! RGBA images carry alpha as the fourth sample: `[R G B A R G B A ...]`.

use crate::pixel::{quantize_u8, Rgb};
use crate::{Error, Result};

/// Sample type of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per sample.
    U8,
    /// Normalized `f32` samples.
    F32,
}

/// Sample storage, one variant per [`PixelFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// Code values `0..=255`.
    U8(Vec<u8>),
    /// 32-bit float data, nominally `[0, 1]`.
    F32(Vec<f32>),
}

impl PixelData {
    fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }
}

/// An owned RGB/RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// 3 or 4.
    pub channels: u32,
    /// Interleaved samples.
    pub data: PixelData,
}

impl ImageData {
    /// Creates a zero-filled image.
    pub fn new(width: u32, height: u32, channels: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * channels as usize;
        let data = match format {
            PixelFormat::U8 => PixelData::U8(vec![0; len]),
            PixelFormat::F32 => PixelData::F32(vec![0.0; len]),
        };
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Wraps normalized float samples.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            data: PixelData::F32(data),
        }
    }

    /// Wraps 8-bit samples.
    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data: PixelData::U8(data),
        }
    }

    /// Pixel storage format.
    pub fn format(&self) -> PixelFormat {
        match self.data {
            PixelData::U8(_) => PixelFormat::U8,
            PixelData::F32(_) => PixelFormat::F32,
        }
    }

    /// `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `width * height * channels`.
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    /// Checks that the image is a non-empty RGB/RGBA raster whose buffer
    /// matches its declared dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Empty {
                width: self.width,
                height: self.height,
            });
        }
        if self.channels != 3 && self.channels != 4 {
            return Err(Error::UnsupportedChannels(self.channels));
        }
        let expected = self.sample_count();
        let got = self.data.len();
        if expected != got {
            return Err(Error::BufferSize { expected, got });
        }
        Ok(())
    }

    /// Reads the RGB part of pixel `(x, y)` as normalized floats.
    pub fn rgb(&self, x: u32, y: u32) -> Result<Rgb> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let c = self.channels as usize;
        let idx = (y as usize * self.width as usize + x as usize) * c;
        let px = match &self.data {
            PixelData::U8(d) => d
                .get(idx..idx + 3)
                .map(|p| [p[0] as f32 / 255.0, p[1] as f32 / 255.0, p[2] as f32 / 255.0]),
            PixelData::F32(d) => d.get(idx..idx + 3).map(|p| [p[0], p[1], p[2]]),
        };
        px.ok_or(Error::BufferSize {
            expected: self.sample_count(),
            got: self.data.len(),
        })
    }

    /// Copies the samples out as normalized floats.
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U8(bytes) => bytes.iter().map(|&v| f32::from(v) / 255.0).collect(),
            PixelData::F32(samples) => samples.clone(),
        }
    }

    /// Copies the samples out as bytes, rounding floats to nearest.
    pub fn to_u8(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(bytes) => bytes.clone(),
            PixelData::F32(samples) => samples.iter().copied().map(quantize_u8).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_is_zeroed() {
        let img = ImageData::new(4, 2, 3, PixelFormat::U8);
        assert_eq!(img.sample_count(), 24);
        assert_eq!(img.to_u8(), vec![0u8; 24]);
        assert!(img.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_buffers() {
        let short = ImageData::from_u8(2, 2, 3, vec![0; 5]);
        assert!(matches!(short.validate(), Err(Error::BufferSize { expected: 12, got: 5 })));

        let gray = ImageData::from_u8(2, 2, 1, vec![0; 4]);
        assert!(matches!(gray.validate(), Err(Error::UnsupportedChannels(1))));

        let empty = ImageData::from_f32(0, 4, 3, Vec::new());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn rgb_reads_both_formats() {
        let img = ImageData::from_u8(2, 1, 4, vec![0, 0, 0, 255, 255, 51, 0, 255]);
        let px = img.rgb(1, 0).unwrap();
        assert_relative_eq!(px[0], 1.0);
        assert_relative_eq!(px[1], 0.2);
        assert!(img.rgb(2, 0).unwrap_err().is_bounds_error());

        let img = ImageData::from_f32(1, 1, 3, vec![0.25, 0.5, 0.75]);
        assert_eq!(img.rgb(0, 0).unwrap(), [0.25, 0.5, 0.75]);
    }

    #[test]
    fn f32_to_u8_rounds_and_clamps() {
        let img = ImageData::from_f32(1, 1, 3, vec![-0.2, 0.5, 1.7]);
        assert_eq!(img.to_u8(), vec![0, 128, 255]);
    }
}
