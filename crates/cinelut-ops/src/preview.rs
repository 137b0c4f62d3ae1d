//! Live preview of a grade on a raster.
//!
//! The preview applies exactly the same [`GradeOp`] the LUT serializers
//! sample, so what is shown is what gets exported (up to 8-bit quantization).
//! Oversized sources are shrunk first so the longer edge is at most
//! [`PREVIEW_MAX_EDGE`].

use crate::{resize, OpsError, OpsResult};
use cinelut_color::{GradeOp, GradeParams};
use cinelut_core::{quantize_u8, ImageData, PixelData};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Longest preview edge in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 2048;

/// Applies `op` to every pixel. Output is 8-bit with the same size and
/// channel count; alpha is carried through untouched.
pub fn apply_op(image: &ImageData, op: &GradeOp) -> OpsResult<ImageData> {
    image.validate()?;

    let channels = image.channels as usize;
    let row_len = image.width as usize * channels;
    let mut out = vec![0u8; image.sample_count()];

    match &image.data {
        PixelData::U8(src) => {
            out.par_chunks_mut(row_len)
                .zip(src.par_chunks(row_len))
                .for_each(|(dst, src)| {
                    grade_row(dst, src, channels, op, |v| v as f32 / 255.0, |v| v)
                });
        }
        PixelData::F32(src) => {
            out.par_chunks_mut(row_len)
                .zip(src.par_chunks(row_len))
                .for_each(|(dst, src)| grade_row(dst, src, channels, op, |v| v, quantize_u8));
        }
    }

    Ok(ImageData::from_u8(image.width, image.height, image.channels, out))
}

#[inline]
fn grade_row<T: Copy>(
    dst: &mut [u8],
    src: &[T],
    channels: usize,
    op: &GradeOp,
    to_unit: impl Fn(T) -> f32,
    to_alpha: impl Fn(T) -> u8,
) {
    for (d, s) in dst.chunks_exact_mut(channels).zip(src.chunks_exact(channels)) {
        let rgb = op.apply([to_unit(s[0]), to_unit(s[1]), to_unit(s[2])]);
        d[0] = quantize_u8(rgb[0]);
        d[1] = quantize_u8(rgb[1]);
        d[2] = quantize_u8(rgb[2]);
        if channels == 4 {
            d[3] = to_alpha(s[3]);
        }
    }
}

/// Downsamples to [`PREVIEW_MAX_EDGE`] and grades.
pub fn render(image: &ImageData, params: &GradeParams) -> OpsResult<ImageData> {
    render_with_max_edge(image, params, PREVIEW_MAX_EDGE)
}

/// Downsamples to `max_edge` and grades.
pub fn render_with_max_edge(
    image: &ImageData,
    params: &GradeParams,
    max_edge: u32,
) -> OpsResult<ImageData> {
    let source = resize::downsample_to_edge(image, max_edge)?;
    apply_op(&source, &GradeOp::from_params(params))
}

/// Identifies one preview: which displayed image, graded by which version.
///
/// Both halves are opaque to the renderer; callers bump the image key
/// whenever the displayed raster changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    /// Displayed image.
    pub image: u64,
    /// Grade version.
    pub version: u64,
}

impl PreviewKey {
    /// Creates a key.
    pub fn new(image: u64, version: u64) -> Self {
        Self { image, version }
    }
}

/// Preview renderer that memoizes its last result.
///
/// Re-rendering with an unchanged [`PreviewKey`] returns the cached raster.
/// The downsampled source is kept separately, so switching versions on the
/// same image only re-grades.
#[derive(Debug)]
pub struct PreviewRenderer {
    max_edge: u32,
    source: Option<(u64, Arc<ImageData>)>,
    last: Option<(PreviewKey, Arc<ImageData>)>,
}

impl PreviewRenderer {
    /// Renderer capped at [`PREVIEW_MAX_EDGE`].
    pub fn new() -> Self {
        Self {
            max_edge: PREVIEW_MAX_EDGE,
            source: None,
            last: None,
        }
    }

    /// Renderer with a custom edge cap.
    pub fn with_max_edge(max_edge: u32) -> OpsResult<Self> {
        if max_edge == 0 {
            return Err(OpsError::ZeroLimit("max edge"));
        }
        Ok(Self {
            max_edge,
            ..Self::new()
        })
    }

    /// Edge cap in pixels.
    pub fn max_edge(&self) -> u32 {
        self.max_edge
    }

    /// Whether `key` would be served from the cache.
    pub fn is_cached(&self, key: PreviewKey) -> bool {
        self.last.as_ref().is_some_and(|(k, _)| *k == key)
    }

    /// Renders (or returns the memoized) preview for `key`.
    pub fn render(
        &mut self,
        key: PreviewKey,
        image: &ImageData,
        params: &GradeParams,
    ) -> OpsResult<Arc<ImageData>> {
        if let Some((k, cached)) = &self.last {
            if *k == key {
                return Ok(Arc::clone(cached));
            }
        }

        let source = match &self.source {
            Some((image_key, src)) if *image_key == key.image => Arc::clone(src),
            _ => {
                let src = Arc::new(resize::downsample_to_edge(image, self.max_edge)?);
                self.source = Some((key.image, Arc::clone(&src)));
                src
            }
        };

        let graded = Arc::new(apply_op(&source, &GradeOp::from_params(params))?);
        debug!(
            image = key.image,
            version = key.version,
            width = graded.width,
            height = graded.height,
            "rendered preview"
        );
        self.last = Some((key, Arc::clone(&graded)));
        Ok(graded)
    }

    /// Drops every cached raster.
    pub fn invalidate(&mut self) {
        self.source = None;
        self.last = None;
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelut_color::transform;

    fn ramp(width: u32, height: u32, channels: u32) -> ImageData {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.push((x * 255 / (width - 1).max(1)) as u8);
                data.push((y * 255 / (height - 1).max(1)) as u8);
                data.push(((x + y) % 256) as u8);
                if channels == 4 {
                    data.push(77);
                }
            }
        }
        ImageData::from_u8(width, height, channels, data)
    }

    fn warm() -> GradeParams {
        GradeParams {
            contrast: 0.3,
            temperature: 0.8,
            saturation: 1.4,
            shadow_color: [0.3, 0.4, 0.7],
            ..GradeParams::neutral()
        }
    }

    #[test]
    fn neutral_preview_is_identity() {
        let image = ramp(17, 9, 3);
        let out = render(&image, &GradeParams::neutral()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn preview_matches_transform() {
        let image = ramp(12, 12, 4);
        let params = warm();
        let out = render(&image, &params).unwrap();

        let (PixelData::U8(src), PixelData::U8(dst)) = (&image.data, &out.data) else {
            panic!("expected 8-bit data");
        };
        for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact(4)) {
            let want = transform(
                [s[0] as f32 / 255.0, s[1] as f32 / 255.0, s[2] as f32 / 255.0],
                &params,
            );
            for c in 0..3 {
                assert_eq!(d[c], quantize_u8(want[c]));
            }
            assert_eq!(d[3], 77);
        }
    }

    #[test]
    fn oversized_source_is_capped() {
        let image = ImageData::from_u8(64, 16, 3, vec![128; 64 * 16 * 3]);
        let out = render_with_max_edge(&image, &GradeParams::neutral(), 32).unwrap();
        assert_eq!((out.width, out.height), (32, 8));
    }

    #[test]
    fn renderer_memoizes_by_key() {
        let image = ramp(8, 8, 3);
        let mut renderer = PreviewRenderer::new();
        let key = PreviewKey::new(1, 1);

        assert!(!renderer.is_cached(key));
        let first = renderer.render(key, &image, &warm()).unwrap();
        assert!(renderer.is_cached(key));

        // Same key: served from cache even if the caller passes other params.
        let again = renderer.render(key, &image, &GradeParams::neutral()).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let other = renderer.render(PreviewKey::new(1, 2), &image, &GradeParams::neutral()).unwrap();
        assert_eq!(*other, image);
        assert!(!renderer.is_cached(key));

        renderer.invalidate();
        assert!(!renderer.is_cached(PreviewKey::new(1, 2)));
        assert!(PreviewRenderer::with_max_edge(0).is_err());
    }
}
