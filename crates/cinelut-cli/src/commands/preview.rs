//! Preview command

use crate::PreviewArgs;
use anyhow::{Context, Result};
use cinelut_ops::preview;
use tracing::info;

pub fn run(args: PreviewArgs) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let params = super::load_grade(&args.grade)?;

    let graded = preview::render_with_max_edge(&image, &params, args.max_edge)
        .context("Failed to render preview")?;

    info!(
        width = graded.width,
        height = graded.height,
        source_width = image.width,
        source_height = image.height,
        "rendered preview"
    );
    super::save_image(&args.output, &graded)
}
