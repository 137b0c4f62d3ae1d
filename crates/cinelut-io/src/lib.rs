//! # cinelut-io
//!
//! Raster I/O and LUT export for cinelut.
//!
//! - **PNG** - source images, previews and Hald LUT rasters
//! - **JPEG** - source photos and service uploads
//! - **Export** - `.cube` / Hald `.png` files, written atomically
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cinelut_io::{read, write};
//!
//! let image = read("still.jpg")?;
//! write("still.png", &image)?;
//! ```
//!
//! # Dependencies
//!
//! - [`cinelut-core`] - raster buffer
//! - [`cinelut-lut`] - cube and Hald serializers
//! - [`png`], [`jpeg-decoder`], [`jpeg-encoder`] - codecs
//!
//! # Used By
//!
//! - `cinelut-session` - export of the active version
//! - `cinelut-cli` - every command that touches files

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
pub mod export;
pub mod jpeg;
pub mod png;

pub use cinelut_core::ImageData;
pub use detect::Format;
pub use error::{IoError, IoResult};
pub use export::{ensure_extension, export_to, ExportSettings, LutFormat};

use std::path::Path;

/// Reads an image file with format auto-detection.
///
/// Magic bytes win over the extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Png => png::read(path),
        Format::Jpeg => jpeg::read(path),
        Format::Unknown => Err(unsupported(path)),
    }
}

/// Decodes an in-memory image by its magic bytes.
pub fn decode(bytes: &[u8]) -> IoResult<ImageData> {
    match Format::from_bytes(bytes) {
        Format::Png => png::decode(bytes),
        Format::Jpeg => jpeg::decode(bytes),
        Format::Unknown => Err(IoError::Unrecognized("unrecognized leading bytes".into())),
    }
}

/// Writes an image, picking the format from the extension.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let path = path.as_ref();
    match Format::from_extension(path) {
        Format::Png => png::write(path, image),
        Format::Jpeg => jpeg::write(path, image),
        Format::Unknown => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::Unrecognized(path.display().to_string())
}
