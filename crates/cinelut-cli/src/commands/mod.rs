//! CLI command implementations

pub mod chart;
pub mod ingest;
pub mod lut;
pub mod preview;

use crate::GradeArgs;
use anyhow::{Context, Result};
use cinelut_color::GradeParams;
use cinelut_core::ImageData;
use std::path::Path;
use tracing::warn;

/// Load image from path
pub fn load_image(path: &Path) -> Result<ImageData> {
    cinelut_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &ImageData) -> Result<()> {
    cinelut_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Builds the grade from a params file and per-field flags.
pub fn load_grade(args: &GradeArgs) -> Result<GradeParams> {
    let mut params = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            cinelut_session::ingest::parse_grade(&text)
                .with_context(|| format!("Invalid grade parameters: {}", path.display()))?
        }
        None => GradeParams::neutral(),
    };

    if let Some(v) = args.contrast {
        params.contrast = v;
    }
    if let Some(v) = args.saturation {
        params.saturation = v;
    }
    if let Some(v) = args.temperature {
        params.temperature = v;
    }
    if let Some(v) = args.tint {
        params.tint = v;
    }
    if let Some(rgb) = args.shadow_color {
        params.shadow_color = rgb;
    }
    if let Some(rgb) = args.highlight_color {
        params.highlight_color = rgb;
    }

    let clamped = params.out_of_range_fields();
    if !clamped.is_empty() {
        warn!(fields = ?clamped, "clamping out-of-range grade values");
    }
    Ok(params.sanitized())
}
