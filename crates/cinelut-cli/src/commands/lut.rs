//! LUT export commands

use crate::LutArgs;
use anyhow::{Context, Result};
use cinelut_io::{export_to, ExportSettings, LutFormat};
use cinelut_lut::GridSize;
use std::path::Path;
use tracing::info;

pub fn run_cube(args: LutArgs) -> Result<()> {
    run(args, LutFormat::Cube)
}

pub fn run_hald(args: LutArgs) -> Result<()> {
    run(args, LutFormat::Png)
}

fn run(args: LutArgs, format: LutFormat) -> Result<()> {
    let params = super::load_grade(&args.grade)?;
    let size = GridSize::new(args.size)?;

    let dir = match args.output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = args
        .output
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid output name: {}", args.output.display()))?;

    let settings = ExportSettings {
        size,
        title: args.title,
    };
    let path = export_to(dir, name, &params, format, &settings)
        .with_context(|| format!("Failed to export {} LUT", format))?;

    info!(path = %path.display(), size = size.get(), "wrote LUT");
    println!("{}", path.display());
    Ok(())
}
