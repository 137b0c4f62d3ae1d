//! Boundary to the external grading service.
//!
//! The service itself (model calls, HTTP) lives outside this crate behind
//! [`GradingService`]. This module validates requests before they leave,
//! shrinks images for upload, and defines what a service may return.

use crate::{Language, Provenance, SessionError, SessionResult};
use cinelut_io::jpeg;
use cinelut_ops::resize;
use thiserror::Error;
use tracing::{debug, warn};

/// Widest image sent to the service.
pub const UPLOAD_MAX_WIDTH: u32 = 800;
/// JPEG quality for uploads.
pub const UPLOAD_QUALITY: u8 = 70;

/// Failure reported by a [`GradingService`] implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status; `body` is the raw
    /// response text.
    #[error("service returned status {status}")]
    Status {
        /// HTTP-style status code.
        status: u16,
        /// Response body, possibly `{"error": "..."}`.
        body: String,
    },

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// How a grade should be derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeMode {
    /// Apply a named or described style.
    Prompt(String),
    /// Match the look of a reference image (encoded bytes).
    Reference(Vec<u8>),
}

impl GradeMode {
    /// Provenance recorded on the resulting version.
    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Prompt(text) => Provenance::Prompt(text.clone()),
            Self::Reference(_) => Provenance::Reference,
        }
    }

    /// Checks the mode-specific input.
    pub fn validate(&self) -> SessionResult<()> {
        match self {
            Self::Prompt(text) if text.trim().is_empty() => {
                Err(SessionError::InvalidRequest("style prompt is empty".into()))
            }
            Self::Reference(bytes) if bytes.is_empty() => {
                Err(SessionError::InvalidRequest("reference image is empty".into()))
            }
            _ => Ok(()),
        }
    }
}

/// A validated, upload-ready grading request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRequest {
    /// Source image, prepared for upload.
    pub source: Vec<u8>,
    /// Reference image, prepared for upload (reference mode only).
    pub reference: Option<Vec<u8>>,
    /// Style prompt (prompt mode only).
    pub prompt: Option<String>,
    /// Language for the returned description.
    pub language: Language,
}

impl GradeRequest {
    /// Validates inputs and prepares both images for upload.
    pub fn new(source: &[u8], mode: &GradeMode, language: Language) -> SessionResult<Self> {
        if source.is_empty() {
            return Err(SessionError::InvalidRequest("source image is empty".into()));
        }
        mode.validate()?;

        let (reference, prompt) = match mode {
            GradeMode::Prompt(text) => (None, Some(text.clone())),
            GradeMode::Reference(bytes) => (Some(prepare_upload(bytes)), None),
        };
        Ok(Self {
            source: prepare_upload(source),
            reference,
            prompt,
            language,
        })
    }
}

/// The external grading collaborator.
///
/// Implementations return the raw JSON body of a successful response;
/// parsing and validation happen on this side of the boundary.
pub trait GradingService: Send + Sync {
    /// Requests grade parameters. Success is a JSON object shaped like
    /// [`GradeParams`](cinelut_color::GradeParams).
    fn grade(&self, request: &GradeRequest) -> Result<String, ServiceError>;

    /// Requests style names for a (prepared) image. Success is
    /// `{"suggestions": [...]}`.
    fn suggest(&self, image: &[u8], language: Language) -> Result<String, ServiceError>;
}

/// Downscales an encoded image to [`UPLOAD_MAX_WIDTH`] and re-encodes it as
/// JPEG. Bytes that cannot be decoded are passed through unchanged.
pub fn prepare_upload(bytes: &[u8]) -> Vec<u8> {
    match try_prepare_upload(bytes) {
        Ok(prepared) => prepared,
        Err(e) => {
            warn!(error = %e, "upload preparation failed; sending original bytes");
            bytes.to_vec()
        }
    }
}

fn try_prepare_upload(bytes: &[u8]) -> SessionResult<Vec<u8>> {
    let image = cinelut_io::decode(bytes)?;
    let small = resize::downsample_to_width(&image, UPLOAD_MAX_WIDTH)?;
    let encoded = jpeg::encode(&small, UPLOAD_QUALITY)?;
    debug!(
        width = small.width,
        height = small.height,
        bytes = encoded.len(),
        "prepared upload"
    );
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinelut_core::ImageData;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = ImageData::from_u8(width, height, 3, vec![120; (width * height * 3) as usize]);
        cinelut_io::png::encode(&image).unwrap()
    }

    #[test]
    fn mode_validation() {
        assert!(GradeMode::Prompt("  \n".into()).validate().is_err());
        assert!(GradeMode::Reference(Vec::new()).validate().is_err());
        assert!(GradeMode::Prompt("Teal".into()).validate().is_ok());
        assert_eq!(GradeMode::Reference(vec![1]).provenance(), Provenance::Reference);
    }

    #[test]
    fn request_requires_source() {
        let err = GradeRequest::new(&[], &GradeMode::Prompt("x".into()), Language::En).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRequest(_)));
    }

    #[test]
    fn uploads_are_shrunk_to_jpeg() {
        let prepared = prepare_upload(&png_bytes(1600, 400));
        let image = jpeg::decode(&prepared).unwrap();
        assert_eq!((image.width, image.height), (800, 200));

        let small = prepare_upload(&png_bytes(40, 30));
        assert_eq!(jpeg::decode(&small).unwrap().width, 40);
    }

    #[test]
    fn undecodable_upload_passes_through() {
        assert_eq!(prepare_upload(b"raw"), b"raw".to_vec());
    }

    #[test]
    fn request_carries_mode_fields() {
        let req = GradeRequest::new(&png_bytes(8, 8), &GradeMode::Prompt("Moody".into()), Language::Zh)
            .unwrap();
        assert_eq!(req.prompt.as_deref(), Some("Moody"));
        assert!(req.reference.is_none());
        assert_eq!(req.language, Language::Zh);
    }
}
