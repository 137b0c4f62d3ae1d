//! # cinelut-core
//!
//! Core types shared by every cinelut crate.
//!
//! - [`Rgb`] - a normalized RGB sample, `[r, g, b]` in `[0, 1]`
//! - [`luminance_rec709`] and the Rec.709 luma weights
//! - [`ImageData`] - an interleaved raster buffer (RGB or RGBA, u8 or f32)
//! - [`Error`] / [`Result`] - buffer-level failures
//!
//! ## Crate Structure
//!
//! ```text
//! cinelut-core (this crate)
//!    ^
//!    +-- cinelut-color   (grade parameters, color transform)
//!    +-- cinelut-lut     (.cube and Hald serializers)
//!    +-- cinelut-io      (PNG, file export)
//!    +-- cinelut-ops     (preview rendering, test chart)
//!    +-- cinelut-session (version history, grading service boundary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;

pub use error::{Error, Result};
pub use image::{ImageData, PixelData, PixelFormat};
pub use pixel::{
    clamp_unit, luminance_rec709, quantize_u8, Rgb, REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G,
    REC709_LUMA_R,
};
