//! The grading session: one source image, its history, and export.

use crate::ingest;
use crate::service::{GradeMode, GradeRequest, GradingService, ServiceError};
use crate::{GradeVersion, History, Language, SessionError, SessionResult, VersionId};
use cinelut_io::export::{self, ExportSettings, LutFormat};
use cinelut_ops::PreviewKey;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// A generation that has been validated and is waiting on the service.
///
/// Holds the source epoch it was started against; completing it after the
/// source changed is rejected.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    epoch: u64,
    mode: GradeMode,
    request: GradeRequest,
}

impl PendingGeneration {
    /// The request to send.
    pub fn request(&self) -> &GradeRequest {
        &self.request
    }
}

/// State for one uploaded source image.
///
/// Replacing or removing the source discards the whole history.
#[derive(Debug, Default)]
pub struct GradeSession {
    source: Option<Arc<[u8]>>,
    epoch: u64,
    history: History,
    language: Language,
}

impl GradeSession {
    /// Empty session.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Output language for service requests and fallbacks.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Changes the output language. Existing versions are untouched.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Loads a new source image (encoded bytes) and clears the history.
    pub fn set_source(&mut self, bytes: impl Into<Arc<[u8]>>) -> SessionResult<()> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SessionError::InvalidRequest("source image is empty".into()));
        }
        self.replace_source(Some(bytes));
        Ok(())
    }

    /// Removes the source image and clears the history.
    pub fn remove_source(&mut self) {
        self.replace_source(None);
    }

    fn replace_source(&mut self, source: Option<Arc<[u8]>>) {
        self.source = source;
        self.epoch += 1;
        self.history.clear();
        debug!(epoch = self.epoch, has_source = self.source.is_some(), "source replaced");
    }

    /// The loaded source image.
    pub fn source(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    /// Counter bumped on every source change.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The version log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The active version.
    pub fn active(&self) -> Option<&GradeVersion> {
        self.history.active()
    }

    /// Activates an existing version.
    pub fn set_active(&mut self, id: VersionId) -> SessionResult<()> {
        self.history.set_active(id)
    }

    /// Cache key for previewing the active version on the source.
    pub fn preview_key(&self) -> Option<PreviewKey> {
        self.active().map(|v| PreviewKey::new(self.epoch, v.id().get()))
    }

    /// Validates a generation and snapshots the current source epoch.
    pub fn begin_generation(&self, mode: GradeMode) -> SessionResult<PendingGeneration> {
        let source = self.source.as_deref().ok_or(SessionError::NoSource)?;
        let request = GradeRequest::new(source, &mode, self.language)?;
        Ok(PendingGeneration {
            epoch: self.epoch,
            mode,
            request,
        })
    }

    /// Records the service outcome as a new active version.
    ///
    /// A failed call or unusable response still appends a version: the
    /// neutral fallback, marked [`is_fallback`](GradeVersion::is_fallback).
    /// Fails with [`SessionError::StaleSource`] if the source changed since
    /// [`begin_generation`](Self::begin_generation).
    pub fn complete_generation(
        &mut self,
        pending: PendingGeneration,
        outcome: Result<String, ServiceError>,
    ) -> SessionResult<&GradeVersion> {
        if pending.epoch != self.epoch {
            return Err(SessionError::StaleSource);
        }
        let language = pending.request.language;
        let (params, is_fallback) = ingest::resolve_grade(outcome, language);
        let provenance = pending.mode.provenance();

        let version = if is_fallback {
            self.history.append_fallback(params, provenance)
        } else {
            self.history.append(params, provenance)
        };
        info!(id = version.id().get(), name = version.display_name(), is_fallback, "new grade version");
        Ok(version)
    }

    /// Runs a whole generation synchronously.
    pub fn generate(
        &mut self,
        service: &dyn GradingService,
        mode: GradeMode,
    ) -> SessionResult<&GradeVersion> {
        let pending = self.begin_generation(mode)?;
        let outcome = service.grade(pending.request());
        self.complete_generation(pending, outcome)
    }

    /// Asks the service for style names, falling back to the fixed list.
    pub fn suggest_styles(&self, service: &dyn GradingService) -> SessionResult<Vec<String>> {
        let source = self.source.as_deref().ok_or(SessionError::NoSource)?;
        let upload = crate::service::prepare_upload(source);
        Ok(ingest::resolve_suggestions(
            service.suggest(&upload, self.language),
            self.language,
        ))
    }

    /// Default file name (without extension) for exporting the active version.
    pub fn suggested_export_name(&self) -> Option<&str> {
        self.active().map(|v| v.display_name())
    }

    /// Renders the active version into `dir`.
    ///
    /// `name` defaults to the version's display name; the format's extension
    /// is appended when missing.
    pub fn export_active<P: AsRef<Path>>(
        &self,
        dir: P,
        name: Option<&str>,
        format: LutFormat,
        settings: &ExportSettings,
    ) -> SessionResult<PathBuf> {
        let version = self.active().ok_or(SessionError::NoActiveVersion)?;
        let name = name.unwrap_or(version.display_name());
        Ok(export::export_to(dir, name, version.params(), format, settings)?)
    }
}

/// A [`GradeSession`] shared between threads.
///
/// History changes are serialized through one lock. The service call runs
/// with the lock released, and only one generation may be in flight.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Shared>>,
}

#[derive(Debug, Default)]
struct Shared {
    session: GradeSession,
    in_flight: bool,
}

impl SharedSession {
    /// Wraps a session.
    pub fn new(session: GradeSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                session,
                in_flight: false,
            })),
        }
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut GradeSession) -> R) -> R {
        f(&mut self.shared().session)
    }

    /// Whether a generation is pending.
    pub fn is_generating(&self) -> bool {
        self.shared().in_flight
    }

    /// Generates a version, calling the service without holding the lock.
    ///
    /// Returns the new version's id. Fails with [`SessionError::Busy`] if
    /// another generation is pending, and [`SessionError::StaleSource`] if
    /// the source changed during the call.
    pub fn generate(&self, service: &dyn GradingService, mode: GradeMode) -> SessionResult<VersionId> {
        let pending = {
            let mut shared = self.shared();
            if shared.in_flight {
                return Err(SessionError::Busy);
            }
            let pending = shared.session.begin_generation(mode)?;
            shared.in_flight = true;
            pending
        };

        let outcome = {
            let _flight = InFlight(self);
            service.grade(pending.request())
        };

        self.shared()
            .session
            .complete_generation(pending, outcome)
            .map(|v| v.id())
    }
}

/// Clears the in-flight flag when dropped, including on unwind.
struct InFlight<'a>(&'a SharedSession);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.shared().in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, u16>);

    impl GradingService for Fixed {
        fn grade(&self, _request: &GradeRequest) -> Result<String, ServiceError> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(ServiceError::Status {
                    status,
                    body: String::new(),
                }),
            }
        }

        fn suggest(&self, _image: &[u8], _language: Language) -> Result<String, ServiceError> {
            Err(ServiceError::Network("offline".into()))
        }
    }

    const WARM: &str = r#"{"contrast": 0.1, "saturation": 1.2, "temperature": 0.5, "tint": 0,
        "shadowsColor": [0.5, 0.5, 0.5], "highlightsColor": [0.5, 0.5, 0.5], "description": "warm"}"#;

    fn loaded() -> GradeSession {
        let mut s = GradeSession::new(Language::En);
        s.set_source(vec![1u8, 2, 3]).unwrap();
        s
    }

    #[test]
    fn generate_appends_and_activates() {
        let mut s = loaded();
        let v = s.generate(&Fixed(Ok(WARM)), GradeMode::Prompt("Warm Vintage".into())).unwrap();
        assert_eq!(v.display_name(), "Warm_Vintage_v1");
        assert_eq!(v.params().temperature, 0.5);
        assert!(!v.is_fallback());
        assert_eq!(s.suggested_export_name(), Some("Warm_Vintage_v1"));
    }

    #[test]
    fn failure_appends_fallback() {
        let mut s = loaded();
        let v = s.generate(&Fixed(Err(500)), GradeMode::Reference(vec![9])).unwrap();
        assert!(v.is_fallback());
        assert!(v.params().is_neutral());
        assert_eq!(v.display_name(), "Ref_Match_v1");
        assert_eq!(v.params().description, "Generation Failed: HTTP 500");
    }

    #[test]
    fn misuse_is_reported() {
        let mut s = GradeSession::new(Language::En);
        let err = s.generate(&Fixed(Ok(WARM)), GradeMode::Prompt("x".into())).unwrap_err();
        assert!(matches!(err, SessionError::NoSource));
        assert!(s.set_source(Vec::<u8>::new()).is_err());

        let mut s = loaded();
        let err = s.generate(&Fixed(Ok(WARM)), GradeMode::Prompt(" ".into())).unwrap_err();
        assert!(err.is_invalid_state());
        assert!(s.history().is_empty());

        let dir = tempfile::tempdir().unwrap();
        let err = s
            .export_active(dir.path(), None, LutFormat::Cube, &ExportSettings::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::NoActiveVersion));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut s = loaded();
        let pending = s.begin_generation(GradeMode::Prompt("x".into())).unwrap();
        s.set_source(vec![4u8]).unwrap();

        let err = s.complete_generation(pending, Ok(WARM.into())).unwrap_err();
        assert!(matches!(err, SessionError::StaleSource));
        assert!(s.history().is_empty());
    }

    #[test]
    fn new_source_clears_history() {
        let mut s = loaded();
        s.generate(&Fixed(Ok(WARM)), GradeMode::Prompt("x".into())).unwrap();
        let key = s.preview_key().unwrap();

        s.set_source(vec![7u8]).unwrap();
        assert!(s.history().is_empty());
        assert!(s.active().is_none());
        assert!(s.preview_key().is_none());

        s.generate(&Fixed(Ok(WARM)), GradeMode::Prompt("x".into())).unwrap();
        assert_ne!(s.preview_key().unwrap(), key);
    }

    #[test]
    fn suggestions_fall_back() {
        let s = loaded();
        let styles = s.suggest_styles(&Fixed(Ok(WARM))).unwrap();
        assert_eq!(styles[0], "Cinematic High Contrast");
    }

    #[test]
    fn shared_session_round_trip() {
        let shared = SharedSession::new(loaded());
        let id = shared.generate(&Fixed(Ok(WARM)), GradeMode::Prompt("x".into())).unwrap();
        assert!(!shared.is_generating());
        assert_eq!(shared.with(|s| s.active().map(|v| v.id())), Some(id));
    }
}
