//! # cinelut-color
//!
//! The color transform every cinelut output is built from.
//!
//! - [`GradeParams`] - one generated look: contrast, saturation, white
//!   balance and split-tone colors, plus a human description
//! - [`GradeOp`] - the resolved, range-clamped form of a [`GradeParams`],
//!   cheap to copy into hot loops
//! - [`transform`] - `(rgb, params) -> rgb`, pure and total
//!
//! # Processing order
//!
//! ```text
//! contrast -> white balance -> saturation -> split toning -> clamp
//! ```
//!
//! # Example
//!
//! ```rust
//! use cinelut_color::{transform, GradeParams};
//!
//! let neutral = GradeParams::neutral();
//! assert_eq!(transform([0.2, 0.4, 0.6], &neutral), [0.2, 0.4, 0.6]);
//! ```
//!
//! # Used By
//!
//! - `cinelut-lut` - LUT lattice sampling
//! - `cinelut-ops` - preview rendering
//! - `cinelut-session` - version history

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod params;
mod transform;

pub use params::{
    GradeParams, CONTRAST_RANGE, NEUTRAL_TONE, SATURATION_RANGE, TEMPERATURE_RANGE, TINT_RANGE,
};
pub use transform::{transform, GradeOp, TEMPERATURE_BIAS, TINT_BIAS, TONE_STRENGTH};
