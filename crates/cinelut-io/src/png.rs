//! PNG codec.
//!
//! Reads 8-bit and 16-bit PNGs (16-bit is stripped to 8) and writes 8-bit
//! RGB/RGBA. Hald LUT rasters go through [`encode`], so a failed encode never
//! leaves a partial file behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinelut_io::png;
//!
//! let image = png::read("frame.png")?;
//! png::write("graded.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use cinelut_core::ImageData;
use std::fs::File;
use std::io::{BufReader, BufRead, Cursor, Seek};
use std::path::Path;

/// Reads and decodes a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

/// Decodes a PNG held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    decode_from(Cursor::new(bytes))
}

fn decode_from<R: BufRead + Seek>(source: R) -> IoResult<ImageData> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::decode("PNG", e))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::decode("PNG", "frame size overflows"))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::decode("PNG", e))?;
    let frame = &buf[..info.buffer_size()];

    let (channels, data) = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => (3, frame.to_vec()),
        (png::ColorType::Rgba, png::BitDepth::Eight) => (4, frame.to_vec()),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            (3, frame.iter().flat_map(|&g| [g, g, g]).collect())
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            let rgba = frame
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            (4, rgba)
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedLayout(format!("{color_type:?}/{bit_depth:?}")));
        }
    };

    let image = ImageData::from_u8(info.width, info.height, channels, data);
    image.validate()?;
    Ok(image)
}

/// Encodes `image` and writes it to `path`.
///
/// The file is encoded in memory first and written in one call.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let bytes = encode(image)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Encodes an image as an 8-bit PNG. Float data is quantized (rounded).
pub fn encode(image: &ImageData) -> IoResult<Vec<u8>> {
    image.validate()?;

    let color_type = match image.channels {
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::UnsupportedLayout(format!("{n}-channel"))),
    };

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());

        let mut png_writer = encoder
            .write_header()
            .map_err(|e| IoError::encode("PNG", e))?;

        png_writer
            .write_image_data(&image.to_u8())
            .map_err(|e| IoError::encode("PNG", e))?;

        png_writer
            .finish()
            .map_err(|e| IoError::encode("PNG", e))?;
    }
    Ok(out)
}
