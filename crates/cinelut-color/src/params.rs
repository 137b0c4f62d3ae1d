//! Grade parameter record.
//!
//! A [`GradeParams`] is what the grading service hands back for one
//! generation. Field names on the wire follow the service schema
//! (`shadowsColor`, `highlightsColor`, ...).

use cinelut_core::Rgb;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid contrast range. `0.0` is identity.
pub const CONTRAST_RANGE: RangeInclusive<f32> = -1.0..=1.0;
/// Valid saturation range. `1.0` is identity.
pub const SATURATION_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Valid temperature range, cool (-1) to warm (+1). `0.0` is identity.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = -1.0..=1.0;
/// Valid tint range, green (-1) to magenta (+1). `0.0` is identity.
pub const TINT_RANGE: RangeInclusive<f32> = -1.0..=1.0;
/// Split-tone color that leaves the image untouched.
pub const NEUTRAL_TONE: Rgb = [0.5, 0.5, 0.5];

/// One color grade.
///
/// Construct through [`GradeParams::neutral`] or deserialize from the service
/// schema and call [`sanitized`](Self::sanitized) before storing. The
/// transform clamps again at use, so an unchecked record can never push
/// values outside `[0, 1]` into LUT output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeParams {
    /// Contrast around mid-gray, `[-1, 1]`.
    pub contrast: f32,
    /// Saturation multiplier, `[0, 2]`.
    pub saturation: f32,
    /// White balance temperature, `[-1, 1]`.
    pub temperature: f32,
    /// White balance tint, `[-1, 1]`.
    pub tint: f32,
    /// Shadow tone color, each channel `[0, 1]`.
    #[serde(rename = "shadowsColor", alias = "shadowColor")]
    pub shadow_color: Rgb,
    /// Highlight tone color, each channel `[0, 1]`.
    #[serde(rename = "highlightsColor", alias = "highlightColor")]
    pub highlight_color: Rgb,
    /// Free-form description of the look.
    #[serde(default)]
    pub description: String,
}

impl GradeParams {
    /// The identity grade.
    pub fn neutral() -> Self {
        Self {
            contrast: 0.0,
            saturation: 1.0,
            temperature: 0.0,
            tint: 0.0,
            shadow_color: NEUTRAL_TONE,
            highlight_color: NEUTRAL_TONE,
            description: String::new(),
        }
    }

    /// The identity grade carrying a description (used for failed generations).
    pub fn neutral_with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::neutral()
        }
    }

    /// Returns `true` when every numeric field is at its identity value.
    pub fn is_neutral(&self) -> bool {
        self.contrast == 0.0
            && self.saturation == 1.0
            && self.temperature == 0.0
            && self.tint == 0.0
            && self.shadow_color == NEUTRAL_TONE
            && self.highlight_color == NEUTRAL_TONE
    }

    /// Returns a copy with every numeric field clamped into its declared range.
    ///
    /// Non-finite values fall back to the field's identity value.
    pub fn sanitized(&self) -> Self {
        Self {
            contrast: clamp_field(self.contrast, CONTRAST_RANGE, 0.0),
            saturation: clamp_field(self.saturation, SATURATION_RANGE, 1.0),
            temperature: clamp_field(self.temperature, TEMPERATURE_RANGE, 0.0),
            tint: clamp_field(self.tint, TINT_RANGE, 0.0),
            shadow_color: clamp_tone(self.shadow_color),
            highlight_color: clamp_tone(self.highlight_color),
            description: self.description.clone(),
        }
    }

    /// Names of the fields [`sanitized`](Self::sanitized) would change.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !in_range(self.contrast, &CONTRAST_RANGE) {
            fields.push("contrast");
        }
        if !in_range(self.saturation, &SATURATION_RANGE) {
            fields.push("saturation");
        }
        if !in_range(self.temperature, &TEMPERATURE_RANGE) {
            fields.push("temperature");
        }
        if !in_range(self.tint, &TINT_RANGE) {
            fields.push("tint");
        }
        if !self.shadow_color.iter().all(|&c| in_range(c, &(0.0..=1.0))) {
            fields.push("shadowsColor");
        }
        if !self.highlight_color.iter().all(|&c| in_range(c, &(0.0..=1.0))) {
            fields.push("highlightsColor");
        }
        fields
    }
}

impl Default for GradeParams {
    fn default() -> Self {
        Self::neutral()
    }
}

#[inline]
fn in_range(v: f32, range: &RangeInclusive<f32>) -> bool {
    v.is_finite() && range.contains(&v)
}

#[inline]
fn clamp_field(v: f32, range: RangeInclusive<f32>, identity: f32) -> f32 {
    if !v.is_finite() {
        return identity;
    }
    v.clamp(*range.start(), *range.end())
}

#[inline]
fn clamp_tone(rgb: Rgb) -> Rgb {
    [
        clamp_field(rgb[0], 0.0..=1.0, 0.5),
        clamp_field(rgb[1], 0.0..=1.0, 0.5),
        clamp_field(rgb[2], 0.0..=1.0, 0.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_is_neutral() {
        assert!(GradeParams::neutral().is_neutral());
        assert!(GradeParams::default().out_of_range_fields().is_empty());
    }

    #[test]
    fn sanitize_clamps_each_field() {
        let wild = GradeParams {
            contrast: 3.0,
            saturation: -1.0,
            temperature: f32::NAN,
            tint: -7.5,
            shadow_color: [1.2, -0.1, 0.3],
            highlight_color: [0.5, f32::INFINITY, 0.5],
            description: "wild".into(),
        };
        assert_eq!(
            wild.out_of_range_fields(),
            vec!["contrast", "saturation", "temperature", "tint", "shadowsColor", "highlightsColor"]
        );

        let clean = wild.sanitized();
        assert_eq!(clean.contrast, 1.0);
        assert_eq!(clean.saturation, 0.0);
        assert_eq!(clean.temperature, 0.0);
        assert_eq!(clean.tint, -1.0);
        assert_eq!(clean.shadow_color, [1.0, 0.0, 0.3]);
        assert_eq!(clean.highlight_color, [0.5, 0.5, 0.5]);
        assert_eq!(clean.description, "wild");
        assert!(clean.out_of_range_fields().is_empty());
    }

    #[test]
    fn deserializes_service_schema() {
        let json = r#"{
            "contrast": 0.2,
            "saturation": 1.1,
            "temperature": 0.3,
            "tint": -0.1,
            "shadowsColor": [0.4, 0.5, 0.6],
            "highlightsColor": [0.6, 0.5, 0.4],
            "description": "Teal and orange"
        }"#;
        let params: GradeParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.contrast, 0.2);
        assert_eq!(params.shadow_color, [0.4, 0.5, 0.6]);
        assert_eq!(params.description, "Teal and orange");

        let back = serde_json::to_value(&params).unwrap();
        assert!(back.get("highlightsColor").is_some());
    }

    #[test]
    fn rejects_wrong_tone_arity() {
        let json = r#"{"contrast":0,"saturation":1,"temperature":0,"tint":0,
            "shadowsColor":[0.5,0.5],"highlightsColor":[0.5,0.5,0.5]}"#;
        assert!(serde_json::from_str::<GradeParams>(json).is_err());
    }
}
