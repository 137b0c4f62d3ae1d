//! Hald-style raster LUTs.
//!
//! The `N^3` lattice samples are laid out as pixels of a square RGB image of
//! edge `E = ceil(sqrt(N^3))`. Pixels are read row-major, and pixel index
//! `p = y * E + x` decodes to lattice coordinates:
//!
//! ```text
//! r = p mod N
//! g = (p / N) mod N
//! b = p / N^2
//! ```
//!
//! Pixels with `p >= N^3` are padding and are always black. Each lattice
//! sample is quantized to 8 bits per channel, rounding to nearest.

use crate::{GridSize, Lattice, LutError, LutResult, MAX_GRID_SIZE, MIN_GRID_SIZE};
use cinelut_color::GradeParams;
use cinelut_core::{quantize_u8, ImageData, PixelData, Rgb};
use tracing::debug;

/// Edge length of the square raster for `size`.
///
/// # Example
///
/// ```rust
/// use cinelut_lut::{hald, GridSize};
///
/// assert_eq!(hald::edge(GridSize::new(2)?), 3);   // 8 samples -> 3x3
/// assert_eq!(hald::edge(GridSize::new(16)?), 64); // 4096 samples -> 64x64
/// # Ok::<(), cinelut_lut::LutError>(())
/// ```
pub fn edge(size: GridSize) -> u32 {
    let points = size.points();
    let mut e = (points as f64).sqrt() as usize;
    while e * e < points {
        e += 1;
    }
    while e > 0 && (e - 1) * (e - 1) >= points {
        e -= 1;
    }
    e as u32
}

/// Lattice coordinates `(r, g, b)` stored at pixel index `pixel`, or `None`
/// for padding pixels.
#[inline]
pub fn pixel_to_grid(pixel: usize, size: GridSize) -> Option<(usize, usize, usize)> {
    if pixel >= size.points() {
        return None;
    }
    Some(Lattice::new(size).coords(pixel))
}

/// Pixel index holding lattice point `(r, g, b)`.
#[inline]
pub fn grid_to_pixel(r: usize, g: usize, b: usize, size: GridSize) -> usize {
    Lattice::new(size).index(r, g, b)
}

/// Renders the grade as a Hald raster (RGB, 8-bit).
///
/// # Example
///
/// ```rust
/// use cinelut_color::GradeParams;
/// use cinelut_lut::{hald, GridSize};
///
/// let img = hald::serialize(&GradeParams::neutral(), GridSize::new(4)?)?;
/// assert_eq!((img.width, img.height, img.channels), (8, 8, 3));
/// # Ok::<(), cinelut_lut::LutError>(())
/// ```
pub fn serialize(params: &GradeParams, size: GridSize) -> LutResult<ImageData> {
    let samples = Lattice::new(size).sample(params);
    encode_samples(&samples, size)
}

/// Lays out pre-sampled lattice values (R-fastest order) as a Hald raster.
pub fn encode_samples(samples: &[Rgb], size: GridSize) -> LutResult<ImageData> {
    if samples.len() != size.points() {
        return Err(LutError::SampleCount {
            expected: size.points(),
            got: samples.len(),
        });
    }

    let e = edge(size);
    let pixels = e as usize * e as usize;
    let mut data = vec![0u8; pixels * 3];

    // Pixel p holds sample p; the tail beyond N^3 stays black.
    for (px, rgb) in data.chunks_exact_mut(3).zip(samples) {
        px[0] = quantize_u8(rgb[0]);
        px[1] = quantize_u8(rgb[1]);
        px[2] = quantize_u8(rgb[2]);
    }

    debug!(
        size = size.get(),
        edge = e,
        padding = pixels - samples.len(),
        "encoded Hald raster"
    );

    Ok(ImageData::from_u8(e, e, 3, data))
}

/// Finds the grid size whose raster edge equals `width`.
pub fn infer_size(width: u32) -> Option<GridSize> {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE)
        .filter_map(|n| GridSize::new(n).ok())
        .find(|&size| edge(size) == width)
}

/// Recovers the lattice samples (R-fastest) from a Hald raster.
pub fn decode(image: &ImageData, size: GridSize) -> LutResult<Vec<Rgb>> {
    image.validate()?;

    let e = edge(size);
    if image.width != e || image.height != e {
        return Err(LutError::RasterShape {
            size: size.get(),
            edge: e,
            width: image.width,
            height: image.height,
        });
    }

    let c = image.channels as usize;
    let samples = (0..size.points())
        .map(|p| {
            let idx = p * c;
            match &image.data {
                PixelData::U8(d) => [
                    d[idx] as f32 / 255.0,
                    d[idx + 1] as f32 / 255.0,
                    d[idx + 2] as f32 / 255.0,
                ],
                PixelData::F32(d) => [d[idx], d[idx + 1], d[idx + 2]],
            }
        })
        .collect();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> GridSize {
        GridSize::new(n).unwrap()
    }

    #[test]
    fn edge_is_ceil_sqrt() {
        assert_eq!(edge(size(2)), 3);
        assert_eq!(edge(size(3)), 6); // 27 -> 5.196
        assert_eq!(edge(size(4)), 8);
        assert_eq!(edge(size(17)), 71); // 4913 -> 70.09
        assert_eq!(edge(size(33)), 190); // 35937 -> 189.57
        assert_eq!(edge(size(64)), 512);
        for n in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            let e = edge(size(n)) as usize;
            assert!(e * e >= n * n * n);
            assert!((e - 1) * (e - 1) < n * n * n);
        }
    }

    #[test]
    fn decode_roundtrips_every_pixel() {
        for n in [2, 5, 17] {
            let s = size(n);
            for p in 0..s.points() {
                let (r, g, b) = pixel_to_grid(p, s).unwrap();
                assert!(r < n && g < n && b < n);
                assert_eq!(grid_to_pixel(r, g, b, s), p);
            }
            let e = edge(s) as usize;
            for p in s.points()..e * e {
                assert!(pixel_to_grid(p, s).is_none());
            }
        }
    }

    #[test]
    fn neutral_raster_encodes_identity() {
        let s = size(2);
        let img = serialize(&GradeParams::neutral(), s).unwrap();
        assert_eq!((img.width, img.height), (3, 3));
        let PixelData::U8(data) = &img.data else {
            panic!("expected 8-bit raster");
        };

        // Pixel 1 is r=1, g=0, b=0 -> pure red; pixel 6 is (0,1,1) -> cyan.
        assert_eq!(&data[3..6], &[255, 0, 0]);
        assert_eq!(&data[18..21], &[0, 255, 255]);
        assert_eq!(&data[21..24], &[255, 255, 255]);
        // Padding pixel 8 is black.
        assert_eq!(&data[24..27], &[0, 0, 0]);
    }

    #[test]
    fn neutral_decode_matches_lattice() {
        let s = size(5);
        let img = serialize(&GradeParams::neutral(), s).unwrap();
        let decoded = decode(&img, s).unwrap();
        let lattice = Lattice::new(s);
        for (i, rgb) in decoded.iter().enumerate() {
            let want = lattice.input_at(i);
            for c in 0..3 {
                assert!((rgb[c] - want[c]).abs() <= 0.5 / 255.0 + 1e-6);
            }
        }
    }

    #[test]
    fn infer_size_matches_edge() {
        assert_eq!(infer_size(190), Some(size(33)));
        assert_eq!(infer_size(512), Some(size(64)));
        assert_eq!(infer_size(7), None);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let img = ImageData::from_u8(4, 4, 3, vec![0; 48]);
        assert!(matches!(decode(&img, size(2)), Err(LutError::RasterShape { edge: 3, .. })));
    }
}
