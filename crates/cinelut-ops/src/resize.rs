//! Downsampling.
//!
//! Separable triangle-filter resampling. When shrinking, the filter support
//! widens with the scale factor, so every source pixel contributes and large
//! photos don't alias in the preview.

use crate::{OpsError, OpsResult};
use cinelut_core::ImageData;
use rayon::prelude::*;
use tracing::trace;

#[inline]
fn triangle_weight(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 { 1.0 - x } else { 0.0 }
}

/// Resizes interleaved f32 samples.
///
/// # Example
///
/// ```rust
/// use cinelut_ops::resize::resize;
///
/// let src = vec![0.5f32; 64 * 32 * 3];
/// let out = resize(&src, 64, 32, 3, 16, 8).unwrap();
/// assert_eq!(out.len(), 16 * 8 * 3);
/// ```
pub fn resize(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> OpsResult<Vec<f32>> {
    if src.len() != src_w * src_h * channels {
        return Err(OpsError::ShapeMismatch {
            width: src_w,
            height: src_h,
            channels,
            got: src.len(),
        });
    }
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Err(OpsError::ZeroSize { src_w, src_h, dst_w, dst_h });
    }

    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w);
    Ok(resize_vertical(&temp, dst_w, src_h, channels, dst_h))
}

fn resize_horizontal(src: &[f32], src_w: usize, src_h: usize, channels: usize, dst_w: usize) -> Vec<f32> {
    let scale = src_w as f32 / dst_w as f32;
    let support = scale.max(1.0);
    let mut dst = vec![0.0f32; dst_w * src_h * channels];

    dst.par_chunks_mut(dst_w * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
            for x in 0..dst_w {
                let center = (x as f32 + 0.5) * scale - 0.5;
                let left = ((center - support).floor().max(0.0)) as usize;
                let right = ((center + support).ceil() as usize).min(src_w - 1);

                let mut weight_sum = 0.0f32;
                let out = &mut row[x * channels..(x + 1) * channels];
                for sx in left..=right {
                    let w = triangle_weight((sx as f32 - center) / support);
                    if w == 0.0 {
                        continue;
                    }
                    weight_sum += w;
                    for (c, o) in out.iter_mut().enumerate() {
                        *o += src_row[sx * channels + c] * w;
                    }
                }
                if weight_sum > 0.0 {
                    out.iter_mut().for_each(|o| *o /= weight_sum);
                }
            }
        });

    dst
}

fn resize_vertical(src: &[f32], width: usize, src_h: usize, channels: usize, dst_h: usize) -> Vec<f32> {
    let scale = src_h as f32 / dst_h as f32;
    let support = scale.max(1.0);
    let stride = width * channels;
    let mut dst = vec![0.0f32; stride * dst_h];

    dst.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let center = (y as f32 + 0.5) * scale - 0.5;
            let top = ((center - support).floor().max(0.0)) as usize;
            let bottom = ((center + support).ceil() as usize).min(src_h - 1);

            let mut weight_sum = 0.0f32;
            for sy in top..=bottom {
                let w = triangle_weight((sy as f32 - center) / support);
                if w == 0.0 {
                    continue;
                }
                weight_sum += w;
                let src_row = &src[sy * stride..(sy + 1) * stride];
                for (o, s) in row.iter_mut().zip(src_row) {
                    *o += s * w;
                }
            }
            if weight_sum > 0.0 {
                row.iter_mut().for_each(|o| *o /= weight_sum);
            }
        });

    dst
}

/// Dimensions with the longer edge capped at `max_edge`, aspect preserved.
/// Images that already fit are left alone.
///
/// ```rust
/// use cinelut_ops::resize::fit_within;
///
/// assert_eq!(fit_within(4000, 3000, 2048), (2048, 1536));
/// assert_eq!(fit_within(3000, 4000, 2048), (1536, 2048));
/// assert_eq!(fit_within(640, 480, 2048), (640, 480));
/// ```
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = max_edge as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_edge);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_edge);
    (w, h)
}

/// Dimensions with the width capped at `max_width`, aspect preserved.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    (max_width, ((height as f64 * scale).round() as u32).max(1))
}

/// Resamples `image` to `width` x `height`. The result is f32.
pub fn resize_image(image: &ImageData, width: u32, height: u32) -> OpsResult<ImageData> {
    image.validate()?;
    let data = resize(
        &image.to_f32(),
        image.width as usize,
        image.height as usize,
        image.channels as usize,
        width as usize,
        height as usize,
    )?;
    Ok(ImageData::from_f32(width, height, image.channels, data))
}

/// Shrinks `image` so its longer edge is at most `max_edge`.
///
/// Returns a plain copy when no resampling is needed.
pub fn downsample_to_edge(image: &ImageData, max_edge: u32) -> OpsResult<ImageData> {
    if max_edge == 0 {
        return Err(OpsError::ZeroLimit("max edge"));
    }
    let (w, h) = fit_within(image.width, image.height, max_edge);
    shrink(image, w, h)
}

/// Shrinks `image` so its width is at most `max_width`.
pub fn downsample_to_width(image: &ImageData, max_width: u32) -> OpsResult<ImageData> {
    if max_width == 0 {
        return Err(OpsError::ZeroLimit("max width"));
    }
    let (w, h) = fit_width(image.width, image.height, max_width);
    shrink(image, w, h)
}

fn shrink(image: &ImageData, w: u32, h: u32) -> OpsResult<ImageData> {
    if (w, h) == (image.width, image.height) {
        image.validate()?;
        return Ok(image.clone());
    }
    trace!(from_w = image.width, from_h = image.height, to_w = w, to_h = h, "downsampling");
    resize_image(image, w, h)
}
