//! cinelut - derive, preview and export color-grade LUTs

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cinelut_lut::DEFAULT_GRID_SIZE;
use cinelut_ops::PREVIEW_MAX_EDGE;
use cinelut_session::Language;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cinelut")]
#[command(author, version, about = "Color-grade LUT engine")]
#[command(long_about = "
Turns grade parameters into standard 3D LUTs and previews them.

Examples:
  cinelut cube -p grade.json -o Warm_Vintage_v1         # .cube, 33^3
  cinelut cube --contrast 0.3 --temperature 0.4 -o punchy -s 65
  cinelut cube --shadow-color 0.4,0.5,0.7 -o teal_shadows
  cinelut hald -p grade.json -o look                    # Hald .png
  cinelut preview still.jpg -p grade.json -o graded.png
  cinelut chart -p grade.json -o chart.png              # graded test chart
  cinelut ingest response.json --lang zh -o grade.json  # validate service output
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug). CINELUT_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Language for fallback messages
    #[arg(long, global = true, default_value = "en")]
    lang: Language,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a .cube LUT
    Cube(LutArgs),

    /// Export a Hald .png LUT
    Hald(LutArgs),

    /// Apply a grade to an image
    #[command(visible_alias = "p")]
    Preview(PreviewArgs),

    /// Write the reference test chart, optionally graded
    Chart(ChartArgs),

    /// Validate a grading-service response
    Ingest(IngestArgs),
}

/// Where the grade comes from. Field flags override the file.
#[derive(Args, Clone, Default)]
struct GradeArgs {
    /// Grade parameters JSON (service response shape)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Contrast [-1, 1]
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<f32>,

    /// Saturation [0, 2]
    #[arg(long)]
    saturation: Option<f32>,

    /// Temperature [-1, 1], positive is warmer
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f32>,

    /// Tint [-1, 1], positive is magenta
    #[arg(long, allow_negative_numbers = true)]
    tint: Option<f32>,

    /// Shadow toning color as r,g,b in [0, 1]; 0.5,0.5,0.5 is neutral
    #[arg(long, value_name = "R,G,B", value_parser = parse_rgb)]
    shadow_color: Option<[f32; 3]>,

    /// Highlight toning color as r,g,b in [0, 1]; 0.5,0.5,0.5 is neutral
    #[arg(long, value_name = "R,G,B", value_parser = parse_rgb)]
    highlight_color: Option<[f32; 3]>,
}

fn parse_rgb(text: &str) -> Result<[f32; 3], String> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f32>().map_err(|_| format!("{v:?} is not a number")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f32; 3]>::try_from(values).map_err(|v| format!("expected 3 components, got {}", v.len()))
}

#[derive(Args)]
struct LutArgs {
    #[command(flatten)]
    grade: GradeArgs,

    /// Output file; the extension is added when missing
    #[arg(short, long)]
    output: PathBuf,

    /// Lattice size per axis
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,

    /// LUT title (defaults to the file stem)
    #[arg(short, long)]
    title: Option<String>,
}

#[derive(Args)]
struct PreviewArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    #[command(flatten)]
    grade: GradeArgs,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Longest output edge
    #[arg(long, default_value_t = PREVIEW_MAX_EDGE)]
    max_edge: u32,
}

#[derive(Args)]
struct ChartArgs {
    #[command(flatten)]
    grade: GradeArgs,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct IngestArgs {
    /// Raw response body
    input: PathBuf,

    /// Write the validated grade here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("CINELUT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Cube(args) => commands::lut::run_cube(args),
        Commands::Hald(args) => commands::lut::run_hald(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Chart(args) => commands::chart::run(args),
        Commands::Ingest(args) => commands::ingest::run(args, cli.lang),
    }
}
