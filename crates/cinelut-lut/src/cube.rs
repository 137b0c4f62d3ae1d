//! Adobe/Resolve .cube LUT format support.
//!
//! The .cube format is a simple text-based LUT format widely supported
//! by DaVinci Resolve, Premiere, Final Cut and most color tools.
//!
//! # Format
//!
//! ```text
//! # Created by cinelut
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//!
//! 0.000000 0.000000 0.000000
//! ...
//! 1.000000 1.000000 1.000000
//! ```
//!
//! Data lines run R fastest, then G, then B. Values are written with six
//! fixed decimals, never in exponent notation.

use crate::{GridSize, Lattice, LutError, LutResult};
use cinelut_color::GradeParams;
use cinelut_core::Rgb;
use std::io::{BufRead, Write};
use tracing::debug;

/// Decimal digits per value in data lines.
pub const CUBE_DECIMALS: usize = 6;

/// Renders the grade as `.cube` text.
///
/// The whole file is built in memory, so a failure never leaves a partial
/// LUT behind.
///
/// # Example
///
/// ```rust
/// use cinelut_color::GradeParams;
/// use cinelut_lut::{cube, GridSize};
///
/// let text = cube::serialize(&GradeParams::neutral(), "Neutral", GridSize::new(2)?)?;
/// assert!(text.ends_with("1.000000 1.000000 1.000000\n"));
/// # Ok::<(), cinelut_lut::LutError>(())
/// ```
pub fn serialize(params: &GradeParams, title: &str, size: GridSize) -> LutResult<String> {
    let mut buf = Vec::with_capacity(size.points() * 27 + 128);
    write(&mut buf, params, title, size)?;
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Writes the grade as `.cube` text to `writer`.
pub fn write<W: Write>(writer: W, params: &GradeParams, title: &str, size: GridSize) -> LutResult<()> {
    let lattice = Lattice::new(size);
    let samples = lattice.sample(params);
    debug!(size = size.get(), title, "writing cube LUT");
    write_samples(writer, title, size, &samples)
}

/// Writes pre-sampled lattice values (R-fastest order) as `.cube` text.
pub fn write_samples<W: Write>(
    mut writer: W,
    title: &str,
    size: GridSize,
    samples: &[Rgb],
) -> LutResult<()> {
    if samples.len() != size.points() {
        return Err(LutError::SampleCount {
            expected: size.points(),
            got: samples.len(),
        });
    }

    writeln!(writer, "# Created by cinelut")?;
    writeln!(writer, "TITLE \"{}\"", sanitize_title(title))?;
    writeln!(writer, "LUT_3D_SIZE {}", size.get())?;
    writeln!(writer, "DOMAIN_MIN 0.0 0.0 0.0")?;
    writeln!(writer, "DOMAIN_MAX 1.0 1.0 1.0")?;
    writeln!(writer)?;

    for rgb in samples {
        writeln!(
            writer,
            "{:.prec$} {:.prec$} {:.prec$}",
            rgb[0],
            rgb[1],
            rgb[2],
            prec = CUBE_DECIMALS
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Strips characters that would break the quoted `TITLE` line.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect()
}

/// A parsed 3D `.cube` file.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeFile {
    /// `TITLE` line, if present.
    pub title: Option<String>,
    /// Lattice edge length.
    pub size: usize,
    /// Input domain minimum (per channel).
    pub domain_min: [f32; 3],
    /// Input domain maximum (per channel).
    pub domain_max: [f32; 3],
    /// Output values in file order (R fastest).
    pub data: Vec<Rgb>,
}

impl CubeFile {
    /// Output value at grid point `(r, g, b)`.
    pub fn get(&self, r: usize, g: usize, b: usize) -> Option<Rgb> {
        if r >= self.size || g >= self.size || b >= self.size {
            return None;
        }
        self.data.get(r + g * self.size + b * self.size * self.size).copied()
    }
}

/// Parses a 3D LUT from `.cube` text.
pub fn parse_str(text: &str) -> LutResult<CubeFile> {
    parse(text.as_bytes())
}

/// Parses a 3D LUT from a reader.
///
/// Keywords other than `TITLE`, `LUT_3D_SIZE` and `DOMAIN_MIN`/`MAX` are
/// rejected, as are 1D LUTs and sizes outside the accepted grid range.
pub fn parse<R: BufRead>(reader: R) -> LutResult<CubeFile> {
    let mut title = None;
    let mut size = None;
    let mut domain_min = [0.0; 3];
    let mut domain_max = [1.0; 3];
    let mut data = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            ["TITLE", ..] => {
                title = Some(line["TITLE".len()..].trim().trim_matches('"').to_string());
            }
            ["LUT_3D_SIZE", n] => {
                let n: usize = n
                    .parse()
                    .map_err(|_| malformed(lineno, format!("{n:?} is not a grid size")))?;
                size = Some(GridSize::new(n)?);
            }
            ["LUT_1D_SIZE", ..] => return Err(malformed(lineno, "1D LUTs are not supported")),
            ["DOMAIN_MIN", rest @ ..] => domain_min = triplet(rest, lineno)?,
            ["DOMAIN_MAX", rest @ ..] => domain_max = triplet(rest, lineno)?,
            values => data.push(triplet(values, lineno)?),
        }
    }

    let size = size.ok_or(LutError::MissingSize)?;
    if data.len() != size.points() {
        return Err(LutError::SampleCount {
            expected: size.points(),
            got: data.len(),
        });
    }

    Ok(CubeFile {
        title,
        size: size.get(),
        domain_min,
        domain_max,
        data,
    })
}

fn malformed(line: usize, reason: impl Into<String>) -> LutError {
    LutError::Malformed {
        line,
        reason: reason.into(),
    }
}

fn triplet(fields: &[&str], line: usize) -> LutResult<Rgb> {
    let [r, g, b] = fields else {
        return Err(malformed(line, format!("expected 3 values, found {}", fields.len())));
    };
    let value = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| malformed(line, format!("{s:?} is not a number")))
    };
    Ok([value(r)?, value(g)?, value(b)?])
}
