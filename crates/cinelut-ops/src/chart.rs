//! Reference chart for eyeballing a grade.
//!
//! An 800x600 RGB raster on a `#1a1a1a` background with three bands:
//!
//! ```text
//! y  50..200   luminance ramp, black -> #808080 -> white across x 50..750
//! y 250..400   six saturated bars: R, Y, G, C, B, M
//! y 450..550   six skin-tone swatches, dark to light
//! ```
//!
//! The layout is fixed and the output is byte-for-byte deterministic.

use cinelut_core::{quantize_u8, ImageData};

/// Chart width in pixels.
pub const CHART_WIDTH: u32 = 800;
/// Chart height in pixels.
pub const CHART_HEIGHT: u32 = 600;

const BACKGROUND: [u8; 3] = [0x1a, 0x1a, 0x1a];
const LEFT: u32 = 50;
const SPAN: u32 = 700;
const RAMP_MID: u8 = 0x80;

const RAMP_ROWS: (u32, u32) = (50, 200);
const BAR_ROWS: (u32, u32) = (250, 400);
const SKIN_ROWS: (u32, u32) = (450, 550);

/// Primary and secondary color bars.
pub const COLOR_BARS: [[u8; 3]; 6] = [
    [0xFF, 0x00, 0x00],
    [0xFF, 0xFF, 0x00],
    [0x00, 0xFF, 0x00],
    [0x00, 0xFF, 0xFF],
    [0x00, 0x00, 0xFF],
    [0xFF, 0x00, 0xFF],
];

/// Skin-tone swatches.
pub const SKIN_TONES: [[u8; 3]; 6] = [
    [0x5d, 0x40, 0x37],
    [0x8d, 0x55, 0x24],
    [0xc6, 0x86, 0x42],
    [0xe0, 0xac, 0x69],
    [0xf1, 0xc2, 0x7d],
    [0xff, 0xdb, 0xac],
];

/// Renders the test chart.
///
/// ```rust
/// let chart = cinelut_ops::chart::test_pattern();
/// assert_eq!((chart.width, chart.height, chart.channels), (800, 600, 3));
/// ```
pub fn test_pattern() -> ImageData {
    let mut data = Vec::with_capacity((CHART_WIDTH * CHART_HEIGHT * 3) as usize);
    for y in 0..CHART_HEIGHT {
        for x in 0..CHART_WIDTH {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    ImageData::from_u8(CHART_WIDTH, CHART_HEIGHT, 3, data)
}

fn pixel(x: u32, y: u32) -> [u8; 3] {
    if !(LEFT..LEFT + SPAN).contains(&x) {
        return BACKGROUND;
    }
    let within = |(top, bottom): (u32, u32)| (top..bottom).contains(&y);

    if within(RAMP_ROWS) {
        let v = ramp(x - LEFT);
        [v, v, v]
    } else if within(BAR_ROWS) {
        COLOR_BARS[swatch(x - LEFT, COLOR_BARS.len())]
    } else if within(SKIN_ROWS) {
        SKIN_TONES[swatch(x - LEFT, SKIN_TONES.len())]
    } else {
        BACKGROUND
    }
}

fn swatch(offset: u32, count: usize) -> usize {
    (offset as usize * count / SPAN as usize).min(count - 1)
}

/// Gray level at `offset` pixels into the ramp, sampled at pixel centers.
fn ramp(offset: u32) -> u8 {
    let t = (offset as f32 + 0.5) / SPAN as f32;
    let mid = RAMP_MID as f32 / 255.0;
    let v = if t < 0.5 {
        mid * (t / 0.5)
    } else {
        mid + (1.0 - mid) * ((t - 0.5) / 0.5)
    };
    quantize_u8(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelut_core::PixelData;

    fn at(image: &ImageData, x: u32, y: u32) -> [u8; 3] {
        let PixelData::U8(d) = &image.data else {
            panic!("expected 8-bit chart");
        };
        let i = ((y * image.width + x) * 3) as usize;
        [d[i], d[i + 1], d[i + 2]]
    }

    #[test]
    fn layout() {
        let chart = test_pattern();
        assert_eq!(at(&chart, 0, 0), BACKGROUND);
        assert_eq!(at(&chart, 400, 225), BACKGROUND);
        assert_eq!(at(&chart, 760, 100), BACKGROUND);

        assert_eq!(at(&chart, 60, 300), COLOR_BARS[0]);
        assert_eq!(at(&chart, 745, 300), COLOR_BARS[5]);
        assert_eq!(at(&chart, 60, 500), SKIN_TONES[0]);
        assert_eq!(at(&chart, 745, 549), SKIN_TONES[5]);
        assert_eq!(at(&chart, 745, 550), BACKGROUND);
    }

    #[test]
    fn ramp_is_monotonic_gray() {
        let chart = test_pattern();
        let mut prev = 0;
        for x in LEFT..LEFT + SPAN {
            let [r, g, b] = at(&chart, x, 120);
            assert!(r == g && g == b);
            assert!(r >= prev);
            prev = r;
        }
        assert!(at(&chart, LEFT, 120)[0] <= 1);
        assert!(at(&chart, LEFT + SPAN - 1, 120)[0] >= 254);
        assert!(at(&chart, LEFT + SPAN / 2, 120)[0].abs_diff(RAMP_MID) <= 1);
    }

    #[test]
    fn deterministic() {
        assert_eq!(test_pattern(), test_pattern());
    }
}
