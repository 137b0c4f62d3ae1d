//! # cinelut-lut
//!
//! Samples a grade over the identity cube and serializes the result.
//!
//! # Formats
//!
//! - `.cube` - Adobe/Resolve text LUT ([`cube`] module)
//! - Hald-style raster - the lattice laid out as pixels of a square image
//!   ([`hald`] module)
//!
//! Both serializers sample through [`Lattice`], so for a given grid size
//! they see exactly the same inputs in exactly the same order.
//!
//! # Usage
//!
//! ```rust
//! use cinelut_color::GradeParams;
//! use cinelut_lut::{cube, hald, GridSize};
//!
//! let size = GridSize::new(17)?;
//! let text = cube::serialize(&GradeParams::neutral(), "Neutral", size)?;
//! assert!(text.contains("LUT_3D_SIZE 17"));
//!
//! let raster = hald::serialize(&GradeParams::neutral(), size)?;
//! assert_eq!(raster.width, hald::edge(size));
//! # Ok::<(), cinelut_lut::LutError>(())
//! ```
//!
//! # Dependencies
//!
//! - [`cinelut-color`] - the transform being sampled
//! - [`rayon`] - parallel lattice sampling
//! - [`thiserror`] - Error handling

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod lattice;
pub mod cube;
pub mod hald;

pub use error::{LutError, LutResult};
pub use lattice::{GridSize, Lattice, DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use cube::CubeFile;
