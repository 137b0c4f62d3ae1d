//! RGB sample helpers.
//!
//! All color math in cinelut runs on plain `[f32; 3]` triples in display
//! referred `[0, 1]` range. Helpers here are shared by the transform, the
//! serializers and the preview path so every consumer quantizes identically.

/// A normalized RGB sample `[r, g, b]`.
pub type Rgb = [f32; 3];

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f32; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Calculate Rec.709 luminance from RGB values.
///
/// # Example
/// ```
/// use cinelut_core::luminance_rec709;
/// let luma = luminance_rec709([0.5, 0.3, 0.2]);
/// // 0.5 * 0.2126 + 0.3 * 0.7152 + 0.2 * 0.0722 = 0.3353
/// assert!((luma - 0.3353).abs() < 0.0001);
/// ```
#[inline]
pub fn luminance_rec709(rgb: Rgb) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Clamps a channel to `[0, 1]`.
///
/// NaN maps to `0.0` and negative zero is normalized to positive zero, so
/// formatted output never shows `-0.000000`.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0) + 0.0
}

/// Quantizes a normalized channel to 8 bits (round to nearest).
#[inline]
pub fn quantize_u8(v: f32) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}
