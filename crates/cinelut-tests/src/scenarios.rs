//! Exact-output scenarios for the transform and the `.cube` writer.

use cinelut_color::{transform, GradeParams};
use cinelut_io::{export_to, png, ExportSettings, LutFormat};
use cinelut_lut::{cube, hald, GridSize};
use tempfile::tempdir;

const NEUTRAL_CUBE_2: &str = "\
# Created by cinelut
TITLE \"Neutral\"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0

0.000000 0.000000 0.000000
1.000000 0.000000 0.000000
0.000000 1.000000 0.000000
1.000000 1.000000 0.000000
0.000000 0.000000 1.000000
1.000000 0.000000 1.000000
0.000000 1.000000 1.000000
1.000000 1.000000 1.000000
";

#[test]
fn neutral_cube_is_byte_exact() {
    let dir = tempdir().unwrap();
    let path = export_to(
        dir.path(),
        "Neutral",
        &GradeParams::neutral(),
        LutFormat::Cube,
        &ExportSettings::with_size(GridSize::new(2).unwrap()),
    )
    .unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), NEUTRAL_CUBE_2);
}

#[test]
fn contrast_crushes_quarter_gray() {
    let params = GradeParams {
        contrast: 1.0,
        ..GradeParams::neutral()
    };
    assert_eq!(transform([0.25, 0.25, 0.25], &params), [0.0, 0.0, 0.0]);
}

#[test]
fn default_grid_is_33() {
    let text = cube::serialize(&GradeParams::neutral(), "n", GridSize::default()).unwrap();
    let data_lines = text
        .lines()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
        .count();
    assert_eq!(data_lines, 33 * 33 * 33);
}

#[test]
fn hald_png_survives_disk() {
    let size = GridSize::new(16).unwrap();
    let params = GradeParams {
        saturation: 0.0,
        ..GradeParams::neutral()
    };
    let dir = tempdir().unwrap();
    let path = export_to(dir.path(), "mono.png", &params, LutFormat::Png, &ExportSettings::with_size(size))
        .unwrap();

    let raster = png::read(&path).unwrap();
    assert_eq!((raster.width, raster.height), (64, 64));
    assert_eq!(hald::infer_size(raster.width), Some(size));

    // Fully desaturated: every sample is gray.
    for rgb in hald::decode(&raster, size).unwrap() {
        assert_eq!(rgb[0], rgb[1]);
        assert_eq!(rgb[1], rgb[2]);
    }
}
