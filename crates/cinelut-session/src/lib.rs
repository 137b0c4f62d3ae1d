//! # cinelut-session
//!
//! The stateful side of cinelut: one source image, the grades generated for
//! it, and exporting whichever one is active.
//!
//! # Overview
//!
//! - [`GradeSession`] - owns the source, the [`History`] and the language
//! - [`History`] - append-only, newest-first log of [`GradeVersion`]s
//! - [`GradingService`] - the external model behind a trait
//! - [`ingest`] - strict parsing of service JSON, localized fallbacks
//!
//! # Usage
//!
//! ```rust,ignore
//! use cinelut_io::{ExportSettings, LutFormat};
//! use cinelut_session::{GradeMode, GradeSession, Language};
//!
//! let mut session = GradeSession::new(Language::En);
//! session.set_source(std::fs::read("still.jpg")?)?;
//! session.generate(&service, GradeMode::Prompt("Teal and orange".into()))?;
//! session.export_active("out", None, LutFormat::Cube, &ExportSettings::default())?;
//! ```
//!
//! # Dependencies
//!
//! - [`cinelut-io`] - export and upload encoding
//! - [`serde_json`] - service payloads
//!
//! # Used By
//!
//! - `cinelut-cli` - `ingest` command

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod history;
pub mod ingest;
mod language;
pub mod service;
mod session;
mod version;

pub use error::{SessionError, SessionResult};
pub use history::{
    derive_display_name, History, DEFAULT_BASE_NAME, DISPLAY_NAME_MAX_CHARS, REFERENCE_BASE_NAME,
};
pub use language::Language;
pub use service::{GradeMode, GradeRequest, GradingService, ServiceError, UPLOAD_MAX_WIDTH};
pub use session::{GradeSession, PendingGeneration, SharedSession};
pub use version::{GradeVersion, Provenance, VersionId, REFERENCE_MATCH_LABEL};
