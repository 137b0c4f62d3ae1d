//! Identity-cube sampling.
//!
//! A lattice of size `N` holds `N^3` grid points. Grid index `i` along an
//! axis maps to the input value `i / (N - 1)`. Points are flattened
//! R-fastest, which is the order both `.cube` data lines and Hald pixels use:
//!
//! ```text
//! index = r + g * N + b * N^2
//! ```

use crate::{LutError, LutResult};
use cinelut_color::{GradeOp, GradeParams};
use cinelut_core::Rgb;
use rayon::prelude::*;
use tracing::trace;

/// Grid size used when the caller does not pick one.
pub const DEFAULT_GRID_SIZE: usize = 33;
/// Smallest lattice that still spans the cube.
pub const MIN_GRID_SIZE: usize = 2;
/// Largest lattice accepted by the serializers.
pub const MAX_GRID_SIZE: usize = 129;

/// A validated lattice edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(usize);

impl GridSize {
    /// Validates `size` against [`MIN_GRID_SIZE`]..=[`MAX_GRID_SIZE`].
    pub fn new(size: usize) -> LutResult<Self> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(LutError::UnsupportedGridSize {
                size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        Ok(Self(size))
    }

    /// Edge length `N`.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of grid points, `N^3`.
    #[inline]
    pub fn points(self) -> usize {
        self.0 * self.0 * self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<usize> for GridSize {
    type Error = LutError;

    fn try_from(size: usize) -> LutResult<Self> {
        Self::new(size)
    }
}

/// The identity lattice for one grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    size: GridSize,
}

impl Lattice {
    /// Creates the lattice for `size`.
    pub fn new(size: GridSize) -> Self {
        Self { size }
    }

    /// Grid size of this lattice.
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Number of grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.points()
    }

    /// Always `false`: a lattice has at least `2^3` points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat index of grid point `(r, g, b)`.
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        let n = self.size.get();
        r + g * n + b * n * n
    }

    /// Grid coordinates `(r, g, b)` of flat index `index`.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let n = self.size.get();
        (index % n, (index / n) % n, index / (n * n))
    }

    /// Identity input color at grid point `(r, g, b)`.
    #[inline]
    pub fn input(&self, r: usize, g: usize, b: usize) -> Rgb {
        let max = (self.size.get() - 1) as f32;
        [r as f32 / max, g as f32 / max, b as f32 / max]
    }

    /// Identity input color at flat index `index`.
    #[inline]
    pub fn input_at(&self, index: usize) -> Rgb {
        let (r, g, b) = self.coords(index);
        self.input(r, g, b)
    }

    /// Evaluates the grade at every grid point, R-fastest.
    ///
    /// Sampling runs in parallel; the result order is the flat index order
    /// regardless of scheduling.
    pub fn sample(&self, params: &GradeParams) -> Vec<Rgb> {
        let op = GradeOp::from_params(params);
        self.sample_op(&op)
    }

    /// Same as [`sample`](Self::sample) with an already resolved op.
    pub fn sample_op(&self, op: &GradeOp) -> Vec<Rgb> {
        trace!(size = self.size.get(), identity = op.is_identity(), "sampling lattice");
        (0..self.len())
            .into_par_iter()
            .map(|i| op.apply(self.input_at(i)))
            .collect()
    }
}
