//! JPEG format support.
//!
//! Source photos usually arrive as JPEG; images sent to the grading service
//! are re-encoded as JPEG after downscaling. Decoding always yields 8-bit RGB.

use crate::{IoError, IoResult};
use cinelut_core::ImageData;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Quality used for upload encodes.
pub const DEFAULT_QUALITY: u8 = 80;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    decode_from(BufReader::new(file))
}

/// Decodes a JPEG held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    decode_from(bytes)
}

fn decode_from<R: Read>(reader: R) -> IoResult<ImageData> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::decode("JPEG", e))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::decode("JPEG", "no frame header"))?;

    let data: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => {
            // Big-endian samples; keep the high byte
            pixels.chunks_exact(2).flat_map(|l| [l[0], l[0], l[0]]).collect()
        }
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let ch = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0).round() as u8;
                [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2])]
            })
            .collect(),
    };

    let image = ImageData::from_u8(info.width as u32, info.height as u32, 3, data);
    image.validate()?;
    Ok(image)
}

/// Writes an image as a JPEG file at [`DEFAULT_QUALITY`].
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let bytes = encode(image, DEFAULT_QUALITY)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Encodes an image as baseline RGB JPEG. Alpha is dropped.
pub fn encode(image: &ImageData, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    image.validate()?;
    let (width, height) = match (u16::try_from(image.width), u16::try_from(image.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::encode(
                "JPEG",
                format!("{}x{} exceeds 65535 pixels", image.width, image.height),
            ));
        }
    };

    let u8_data = image.to_u8();
    let rgb: Vec<u8> = if image.channels == 4 {
        u8_data
            .chunks_exact(4)
            .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
            .collect()
    } else {
        u8_data
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality);
    encoder
        .encode(&rgb, width, height, ColorType::Rgb)
        .map_err(|e| IoError::encode("JPEG", e))?;

    Ok(buffer)
}
