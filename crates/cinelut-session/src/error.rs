//! Session error types.

use crate::VersionId;
use cinelut_io::IoError;
use cinelut_ops::OpsError;
use thiserror::Error;

/// Errors from session operations.
///
/// Everything except [`Io`](Self::Io) and [`Image`](Self::Image) is
/// a caller-contract violation; the session state is unchanged when one is
/// returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No version with this id exists in the current history.
    #[error("unknown version: {0}")]
    UnknownVersion(VersionId),

    /// Export or preview requested with no active version.
    #[error("no active version")]
    NoActiveVersion,

    /// Operation needs a source image and none is loaded.
    #[error("no source image loaded")]
    NoSource,

    /// A generation finished after its source image was replaced.
    #[error("source image changed while generating; result discarded")]
    StaleSource,

    /// A second generation was started while one is pending.
    #[error("a generation is already in flight")]
    Busy,

    /// Request failed validation before reaching the service.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Decoding, encoding or writing a file failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Image processing failed.
    #[error(transparent)]
    Image(#[from] OpsError),
}

impl SessionError {
    /// Returns `true` for caller-contract violations (as opposed to file or
    /// image failures).
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::UnknownVersion(_)
                | Self::NoActiveVersion
                | Self::NoSource
                | Self::StaleSource
                | Self::Busy
                | Self::InvalidRequest(_)
        )
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
