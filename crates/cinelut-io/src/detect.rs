//! Sniffing raster containers.
//!
//! Content wins over the file name: a PNG saved as `.jpg` still reads as PNG.

use crate::IoResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Raster containers the codecs understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// Baseline or progressive JPEG.
    Jpeg,
    /// Anything else.
    Unknown,
}

impl Format {
    /// Sniffs the first bytes of `path`, falling back to its extension.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut head = Vec::with_capacity(PNG_SIGNATURE.len());
        File::open(path)?
            .take(PNG_SIGNATURE.len() as u64)
            .read_to_end(&mut head)?;

        Ok(match Self::from_bytes(&head) {
            Format::Unknown => Self::from_extension(path),
            known => known,
        })
    }

    /// Guesses from the extension alone.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Format::Unknown;
        };
        if ext.eq_ignore_ascii_case("png") {
            Format::Png
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Format::Jpeg
        } else {
            Format::Unknown
        }
    }

    /// Recognizes the PNG signature or a JPEG start-of-image marker.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(PNG_SIGNATURE) {
            Format::Png
        } else if bytes.starts_with(JPEG_SOI) {
            Format::Jpeg
        } else {
            Format::Unknown
        }
    }
}
