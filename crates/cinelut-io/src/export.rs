//! LUT file export.
//!
//! An export renders the whole file in memory, writes it next to the target
//! under a temporary name and renames it into place. A failed render or write
//! never leaves a truncated LUT at the requested path.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinelut_io::export::{export_to, ExportSettings, LutFormat};
//!
//! let path = export_to("out", "Warm_Vintage_v1", &params, LutFormat::Cube, &ExportSettings::default())?;
//! assert!(path.ends_with("Warm_Vintage_v1.cube"));
//! ```

use crate::{png, IoError, IoResult};
use cinelut_color::GradeParams;
use cinelut_lut::{cube, hald, GridSize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// LUT file formats known to the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutFormat {
    /// Adobe/Resolve `.cube` text.
    Cube,
    /// Autodesk/Lustre `.3dl`. Listed for recognition only.
    ThreeDl,
    /// Panasonic `.vlt`. Listed for recognition only.
    Vlt,
    /// Hald raster `.png`.
    Png,
}

impl LutFormat {
    /// Every known format.
    pub const ALL: [LutFormat; 4] = [Self::Cube, Self::ThreeDl, Self::Vlt, Self::Png];

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::ThreeDl => "3dl",
            Self::Vlt => "vlt",
            Self::Png => "png",
        }
    }

    /// Whether this format can be written.
    pub fn is_exportable(self) -> bool {
        matches!(self, Self::Cube | Self::Png)
    }

    /// Detects a format from a file name's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl fmt::Display for LutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for LutFormat {
    type Err = IoError;

    fn from_str(s: &str) -> IoResult<Self> {
        let lower = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == lower)
            .ok_or_else(|| IoError::UnknownLutFormat(s.to_string()))
    }
}

/// Knobs for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSettings {
    /// Lattice size shared by both serializers.
    pub size: GridSize,
    /// `.cube` title; defaults to the file stem.
    pub title: Option<String>,
}

impl ExportSettings {
    /// Settings with the given grid size and the default title.
    pub fn with_size(size: GridSize) -> Self {
        Self { size, title: None }
    }
}

/// Appends `.ext` for `format` unless `name` already ends with it
/// (case-insensitive).
pub fn ensure_extension(name: &str, format: LutFormat) -> String {
    let ext = format.extension();
    let has_ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        name.to_string()
    } else {
        format!("{name}.{ext}")
    }
}

/// Renders a LUT file to bytes.
pub fn render(
    params: &GradeParams,
    title: &str,
    format: LutFormat,
    size: GridSize,
) -> IoResult<Vec<u8>> {
    match format {
        LutFormat::Cube => Ok(cube::serialize(params, title, size)?.into_bytes()),
        LutFormat::Png => png::encode(&hald::serialize(params, size)?),
        other => Err(IoError::NotExportable(other)),
    }
}

/// Renders and writes a LUT into `dir`, returning the final path.
///
/// `name` gets the format's extension appended when it is missing.
pub fn export_to<P: AsRef<Path>>(
    dir: P,
    name: &str,
    params: &GradeParams,
    format: LutFormat,
    settings: &ExportSettings,
) -> IoResult<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(IoError::InvalidName("export name is empty".into()));
    }
    if name.contains(['/', '\\']) {
        return Err(IoError::InvalidName(format!(
            "export name must not contain path separators: {name}"
        )));
    }

    let file_name = ensure_extension(name, format);
    let stem = Path::new(&file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let title = settings.title.as_deref().unwrap_or(stem);

    let bytes = render(params, title, format, settings.size)?;

    let path = dir.as_ref().join(&file_name);
    write_atomic(&path, &bytes)?;

    debug!(
        path = %path.display(),
        format = %format,
        size = settings.size.get(),
        bytes = bytes.len(),
        "exported LUT"
    );
    Ok(path)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> IoResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".partial");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_handling() {
        assert_eq!(ensure_extension("Warm_v1", LutFormat::Cube), "Warm_v1.cube");
        assert_eq!(ensure_extension("Warm_v1.CUBE", LutFormat::Cube), "Warm_v1.CUBE");
        assert_eq!(ensure_extension("Warm_v1.cube", LutFormat::Png), "Warm_v1.cube.png");
        assert_eq!(ensure_extension("a.b", LutFormat::Png), "a.b.png");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("cube".parse::<LutFormat>().unwrap(), LutFormat::Cube);
        assert_eq!(".PNG".parse::<LutFormat>().unwrap(), LutFormat::Png);
        assert_eq!("3dl".parse::<LutFormat>().unwrap(), LutFormat::ThreeDl);
        assert!("tiff".parse::<LutFormat>().is_err());
        assert_eq!(LutFormat::from_path("x/look.vlt"), Some(LutFormat::Vlt));
        assert!(LutFormat::Cube.is_exportable());
        assert!(!LutFormat::Vlt.is_exportable());
    }

    #[test]
    fn unsupported_formats_are_rejected() {
        let size = GridSize::new(2).unwrap();
        for format in [LutFormat::ThreeDl, LutFormat::Vlt] {
            let err = render(&GradeParams::neutral(), "x", format, size).unwrap_err();
            assert!(matches!(err, IoError::NotExportable(f) if f == format));
        }
    }

    #[test]
    fn export_cube_uses_stem_as_title() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::with_size(GridSize::new(2).unwrap());
        let path = export_to(dir.path(), "Cool_Moody_v2", &GradeParams::neutral(), LutFormat::Cube, &settings)
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "Cool_Moody_v2.cube");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("TITLE \"Cool_Moody_v2\""));
        assert!(text.contains("LUT_3D_SIZE 2"));
        assert!(!dir.path().join("Cool_Moody_v2.cube.partial").exists());
    }

    #[test]
    fn export_png_is_hald_raster() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::with_size(GridSize::new(4).unwrap());
        let path = export_to(dir.path(), "look", &GradeParams::neutral(), LutFormat::Png, &settings)
            .unwrap();

        let image = png::read(&path).unwrap();
        assert_eq!((image.width, image.height), (8, 8));
    }

    #[test]
    fn failed_export_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::default();
        let err = export_to(dir.path(), "look", &GradeParams::neutral(), LutFormat::Vlt, &settings);
        assert!(err.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        assert!(matches!(
            export_to(dir.path(), "  ", &GradeParams::neutral(), LutFormat::Cube, &settings),
            Err(IoError::InvalidName(_))
        ));
        assert!(matches!(
            export_to(dir.path(), "../escape", &GradeParams::neutral(), LutFormat::Cube, &settings),
            Err(IoError::InvalidName(_))
        ));
    }
}
