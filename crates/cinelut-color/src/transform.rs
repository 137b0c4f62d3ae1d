//! The grade transform.
//!
//! Stages run in a fixed order, each on the previous stage's output:
//!
//! ```text
//! out = 0.5 + (in - 0.5) * (1 + contrast)             contrast
//! out = out + wb_bias                                 white balance
//! out = luma + saturation * (out - luma)              saturation
//! out = out + k * (ws * (shadow - 0.5)
//!                + wh * (highlight - 0.5))            split toning
//! out = clamp(out, 0, 1)
//! ```
//!
//! `luma` is Rec.709 luminance. The split-tone weights are
//! `ws = max(0, 1 - 2Y)` and `wh = max(0, 2Y - 1)`, so shadows and highlights
//! fade out linearly towards mid-gray and neutral tones are a no-op.

use crate::GradeParams;
use cinelut_core::{clamp_unit, luminance_rec709, Rgb};

/// Red/blue shift at `temperature = ±1`.
pub const TEMPERATURE_BIAS: f32 = 0.1;
/// Green shift at `tint = ±1`; red and blue move by half in the opposite direction.
pub const TINT_BIAS: f32 = 0.1;
/// How far a fully weighted split-tone color pulls the channel.
pub const TONE_STRENGTH: f32 = 0.5;

const MID_GRAY: f32 = 0.5;

/// A [`GradeParams`] resolved into the coefficients the transform uses.
///
/// Resolution clamps every field into range, so a `GradeOp` is always safe to
/// apply. It is `Copy` and holds no heap data, which keeps per-sample work in
/// LUT sampling and preview loops down to arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeOp {
    contrast_gain: f32,
    wb_bias: Rgb,
    saturation: f32,
    shadow_offset: Rgb,
    highlight_offset: Rgb,
}

impl GradeOp {
    /// Resolves (and clamps) a parameter set.
    pub fn from_params(params: &GradeParams) -> Self {
        let p = params.sanitized();

        let warm = p.temperature * TEMPERATURE_BIAS;
        let magenta = p.tint * TINT_BIAS;
        let wb_bias = [
            warm + magenta * 0.5,
            -magenta,
            -warm + magenta * 0.5,
        ];

        Self {
            contrast_gain: 1.0 + p.contrast,
            wb_bias,
            saturation: p.saturation,
            shadow_offset: tone_offset(p.shadow_color),
            highlight_offset: tone_offset(p.highlight_color),
        }
    }

    /// The identity operation.
    pub fn identity() -> Self {
        Self::from_params(&GradeParams::neutral())
    }

    /// Returns `true` if applying this op leaves in-range input unchanged.
    pub fn is_identity(&self) -> bool {
        self.is_contrast_identity()
            && self.is_wb_identity()
            && self.is_saturation_identity()
            && self.is_tone_identity()
    }

    /// Applies the grade to one RGB sample. Output is always within `[0, 1]`.
    #[inline]
    pub fn apply(&self, rgb: Rgb) -> Rgb {
        let mut out = rgb;

        if !self.is_contrast_identity() {
            out = self.apply_contrast(out);
        }
        if !self.is_wb_identity() {
            out = self.apply_white_balance(out);
        }
        if !self.is_saturation_identity() {
            out = self.apply_saturation(out);
        }
        if !self.is_tone_identity() {
            out = self.apply_split_tone(out);
        }

        [clamp_unit(out[0]), clamp_unit(out[1]), clamp_unit(out[2])]
    }

    #[inline]
    fn is_contrast_identity(&self) -> bool {
        self.contrast_gain == 1.0
    }

    #[inline]
    fn is_wb_identity(&self) -> bool {
        self.wb_bias == [0.0; 3]
    }

    #[inline]
    fn is_saturation_identity(&self) -> bool {
        self.saturation == 1.0
    }

    #[inline]
    fn is_tone_identity(&self) -> bool {
        self.shadow_offset == [0.0; 3] && self.highlight_offset == [0.0; 3]
    }

    #[inline]
    fn apply_contrast(&self, rgb: Rgb) -> Rgb {
        let k = self.contrast_gain;
        [
            MID_GRAY + (rgb[0] - MID_GRAY) * k,
            MID_GRAY + (rgb[1] - MID_GRAY) * k,
            MID_GRAY + (rgb[2] - MID_GRAY) * k,
        ]
    }

    #[inline]
    fn apply_white_balance(&self, rgb: Rgb) -> Rgb {
        [
            rgb[0] + self.wb_bias[0],
            rgb[1] + self.wb_bias[1],
            rgb[2] + self.wb_bias[2],
        ]
    }

    #[inline]
    fn apply_saturation(&self, rgb: Rgb) -> Rgb {
        let lum = luminance_rec709(rgb);
        [
            lum + self.saturation * (rgb[0] - lum),
            lum + self.saturation * (rgb[1] - lum),
            lum + self.saturation * (rgb[2] - lum),
        ]
    }

    #[inline]
    fn apply_split_tone(&self, rgb: Rgb) -> Rgb {
        let lum = luminance_rec709(rgb);
        let ws = (1.0 - 2.0 * lum).max(0.0);
        let wh = (2.0 * lum - 1.0).max(0.0);
        [
            rgb[0] + ws * self.shadow_offset[0] + wh * self.highlight_offset[0],
            rgb[1] + ws * self.shadow_offset[1] + wh * self.highlight_offset[1],
            rgb[2] + ws * self.shadow_offset[2] + wh * self.highlight_offset[2],
        ]
    }
}

impl Default for GradeOp {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<&GradeParams> for GradeOp {
    fn from(params: &GradeParams) -> Self {
        Self::from_params(params)
    }
}

#[inline]
fn tone_offset(tone: Rgb) -> Rgb {
    [
        (tone[0] - MID_GRAY) * TONE_STRENGTH,
        (tone[1] - MID_GRAY) * TONE_STRENGTH,
        (tone[2] - MID_GRAY) * TONE_STRENGTH,
    ]
}

/// Applies `params` to one RGB sample.
///
/// Pure and total: any input and any parameter set (even out of range)
/// produce an output inside `[0, 1]^3`. Resolving the params costs a little;
/// loops over many samples should build a [`GradeOp`] once instead.
#[inline]
pub fn transform(rgb: Rgb, params: &GradeParams) -> Rgb {
    GradeOp::from_params(params).apply(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f32 = 1e-6;

    fn grid(n: usize) -> impl Iterator<Item = Rgb> {
        let step = 1.0 / (n - 1) as f32;
        (0..n * n * n).map(move |i| {
            [
                (i % n) as f32 * step,
                ((i / n) % n) as f32 * step,
                (i / (n * n)) as f32 * step,
            ]
        })
    }

    fn params(contrast: f32, saturation: f32, temperature: f32, tint: f32) -> GradeParams {
        GradeParams {
            contrast,
            saturation,
            temperature,
            tint,
            ..GradeParams::neutral()
        }
    }

    #[test]
    fn identity() {
        let op = GradeOp::identity();
        assert!(op.is_identity());

        let neutral = GradeParams::neutral();
        for rgb in grid(9) {
            let out = transform(rgb, &neutral);
            for c in 0..3 {
                assert_abs_diff_eq!(out[c], rgb[c], epsilon = EPSILON);
            }
        }
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        let p = params(1.0, 1.0, 0.0, 0.0);
        assert_eq!(transform([0.25, 0.25, 0.25], &p), [0.0, 0.0, 0.0]);
        assert_eq!(transform([0.5, 0.5, 0.5], &p), [0.5, 0.5, 0.5]);
        for c in transform([0.6, 0.6, 0.6], &p) {
            assert_abs_diff_eq!(c, 0.7, epsilon = EPSILON);
        }

        let flat = params(-1.0, 1.0, 0.0, 0.0);
        let out = transform([0.1, 0.9, 0.3], &flat);
        for c in out {
            assert_abs_diff_eq!(c, 0.5, epsilon = EPSILON);
        }
    }

    #[test]
    fn temperature_warms_and_cools() {
        let warm = transform([0.5, 0.5, 0.5], &params(0.0, 1.0, 1.0, 0.0));
        assert!(warm[0] > 0.5 && warm[2] < 0.5);
        assert_abs_diff_eq!(warm[1], 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(warm[0], 0.5 + TEMPERATURE_BIAS, epsilon = EPSILON);

        let cool = transform([0.5, 0.5, 0.5], &params(0.0, 1.0, -1.0, 0.0));
        assert!(cool[0] < 0.5 && cool[2] > 0.5);
    }

    #[test]
    fn tint_moves_green_against_magenta() {
        let magenta = transform([0.5, 0.5, 0.5], &params(0.0, 1.0, 0.0, 1.0));
        assert!(magenta[1] < 0.5);
        assert!(magenta[0] > 0.5 && magenta[2] > 0.5);

        let green = transform([0.5, 0.5, 0.5], &params(0.0, 1.0, 0.0, -1.0));
        assert!(green[1] > 0.5);
    }

    #[test]
    fn zero_saturation_removes_chroma() {
        let p = params(0.0, 0.0, 0.0, 0.0);
        for rgb in grid(7) {
            let out = transform(rgb, &p);
            let lum = luminance_rec709(rgb);
            for c in out {
                assert_abs_diff_eq!(c, lum.clamp(0.0, 1.0), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn zero_saturation_after_grading_is_gray() {
        let p = GradeParams {
            saturation: 0.0,
            contrast: 0.4,
            temperature: 0.7,
            tint: -0.3,
            ..GradeParams::neutral()
        };
        for rgb in grid(5) {
            let out = transform(rgb, &p);
            assert_abs_diff_eq!(out[0], out[1], epsilon = 1e-5);
            assert_abs_diff_eq!(out[1], out[2], epsilon = 1e-5);
        }
    }

    #[test]
    fn split_tone_tints_shadows_and_highlights() {
        let p = GradeParams {
            shadow_color: [0.2, 0.4, 0.8],
            highlight_color: [0.8, 0.6, 0.3],
            ..GradeParams::neutral()
        };

        // Black is pure shadow: pulled towards blue.
        let dark = transform([0.0, 0.0, 0.0], &p);
        assert_eq!(dark[0], 0.0);
        assert_abs_diff_eq!(dark[2], 0.3 * TONE_STRENGTH, epsilon = EPSILON);

        // Mid-gray carries neither weight.
        let mid = transform([0.5, 0.5, 0.5], &p);
        for c in mid {
            assert_abs_diff_eq!(c, 0.5, epsilon = EPSILON);
        }

        // Near white is pulled towards orange.
        let bright = transform([0.9, 0.9, 0.9], &p);
        assert!(bright[0] > bright[2]);
    }

    #[test]
    fn output_always_clamped() {
        let extremes = [
            params(1.0, 2.0, 1.0, 1.0),
            params(-1.0, 0.0, -1.0, -1.0),
            params(5.0, -3.0, 9.0, f32::NAN),
            GradeParams {
                contrast: 1.0,
                saturation: 2.0,
                shadow_color: [1.0, 0.0, 1.0],
                highlight_color: [0.0, 1.0, 0.0],
                ..GradeParams::neutral()
            },
        ];
        for p in &extremes {
            for rgb in grid(6) {
                for c in transform(rgb, p) {
                    assert!((0.0..=1.0).contains(&c), "{c} out of range for {p:?}");
                }
            }
            // Out-of-range input is handled too.
            for c in transform([-2.0, 0.5, 7.0], p) {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn out_of_range_params_match_clamped_params() {
        let wild = params(4.0, 3.0, -2.0, 2.0);
        let clamped = params(1.0, 2.0, -1.0, 1.0);
        assert_eq!(GradeOp::from(&wild), GradeOp::from(&clamped));
    }
}
