//! Test chart command

use crate::ChartArgs;
use anyhow::{Context, Result};
use cinelut_color::GradeOp;
use cinelut_ops::{chart, preview};

pub fn run(args: ChartArgs) -> Result<()> {
    let params = super::load_grade(&args.grade)?;
    let chart = chart::test_pattern();
    let graded = preview::apply_op(&chart, &GradeOp::from_params(&params))
        .context("Failed to grade chart")?;
    super::save_image(&args.output, &graded)
}
