//! # cinelut-ops
//!
//! Raster operations around a grade.
//!
//! - [`preview`] - parallel per-pixel grading with a memoizing renderer
//! - [`resize`] - aspect-preserving downsampling (preview cap, upload width)
//! - [`chart`] - the fixed reference chart
//!
//! # Example
//!
//! ```rust
//! use cinelut_color::GradeParams;
//! use cinelut_ops::{chart, preview};
//!
//! let graded = preview::render(&chart::test_pattern(), &GradeParams::neutral()).unwrap();
//! assert_eq!(graded.width, 800);
//! ```
//!
//! # Dependencies
//!
//! - [`cinelut-color`] - the grade transform
//! - [`rayon`] - row-parallel processing
//!
//! # Used By
//!
//! - `cinelut-session` - upload preparation
//! - `cinelut-cli` - `preview` and `chart` commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod chart;
pub mod preview;
pub mod resize;

pub use error::{OpsError, OpsResult};
pub use preview::{PreviewKey, PreviewRenderer, PREVIEW_MAX_EDGE};
