//! Append-only grade history.
//!
//! Versions live in an arena ordered by id. Nothing is removed or edited
//! individually; the active version is a pointer into the arena and
//! [`History::clear`] drops everything at once.

use crate::{GradeVersion, Provenance, SessionError, SessionResult, VersionId};
use cinelut_color::GradeParams;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Longest sanitized prompt kept in a display name, in characters.
pub const DISPLAY_NAME_MAX_CHARS: usize = 20;
/// Display-name base when there is no usable prompt.
pub const DEFAULT_BASE_NAME: &str = "CineGrade";
/// Display-name base for reference matches.
pub const REFERENCE_BASE_NAME: &str = "Ref_Match";

/// Derives a display name for the `version`-th entry (1-based).
///
/// Prompts keep ASCII letters, digits, `_`, whitespace and CJK ideographs;
/// whitespace runs become one `_` and the result is cut to
/// [`DISPLAY_NAME_MAX_CHARS`].
///
/// ```rust
/// use cinelut_session::{derive_display_name, Provenance};
///
/// let p = Provenance::Prompt("  warm, vintage  film!".into());
/// assert_eq!(derive_display_name(&p, 3), "warm_vintage_film_v3");
/// assert_eq!(derive_display_name(&Provenance::Reference, 1), "Ref_Match_v1");
/// ```
pub fn derive_display_name(provenance: &Provenance, version: usize) -> String {
    let base = match provenance {
        Provenance::Reference => REFERENCE_BASE_NAME.to_string(),
        Provenance::Prompt(text) => {
            let base = sanitize_prompt(text);
            if base.is_empty() {
                DEFAULT_BASE_NAME.to_string()
            } else {
                base
            }
        }
    };
    format!("{base}_v{version}")
}

fn sanitize_prompt(text: &str) -> String {
    let kept = text
        .trim()
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || is_cjk(c));

    let mut out = String::new();
    let mut in_space = false;
    for c in kept {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.chars().take(DISPLAY_NAME_MAX_CHARS).collect()
}

#[inline]
fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// The version log of one source image.
#[derive(Debug, Default)]
pub struct History {
    versions: Vec<GradeVersion>,
    active: Option<VersionId>,
    next_id: u64,
    last_created_at: u64,
}

impl History {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a version and makes it active.
    pub fn append(&mut self, params: GradeParams, provenance: Provenance) -> &GradeVersion {
        self.push(params, provenance, false)
    }

    /// Appends a fallback version (neutral grade after a failed generation)
    /// and makes it active.
    pub fn append_fallback(&mut self, params: GradeParams, provenance: Provenance) -> &GradeVersion {
        self.push(params, provenance, true)
    }

    fn push(&mut self, params: GradeParams, provenance: Provenance, is_fallback: bool) -> &GradeVersion {
        self.next_id += 1;
        let id = VersionId::new(self.next_id);
        let created_at = now_millis().max(self.last_created_at + 1);
        self.last_created_at = created_at;

        let version = GradeVersion {
            id,
            created_at,
            display_name: derive_display_name(&provenance, self.versions.len() + 1),
            provenance,
            params: params.sanitized(),
            is_fallback,
        };
        debug!(id = id.get(), name = %version.display_name, is_fallback, "appended version");

        self.versions.push(version);
        self.active = Some(id);
        &self.versions[self.versions.len() - 1]
    }

    /// Points the active version at `id`. Unknown ids leave the history
    /// untouched.
    pub fn set_active(&mut self, id: VersionId) -> SessionResult<()> {
        if self.get(id).is_none() {
            return Err(SessionError::UnknownVersion(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// The active version, if any.
    pub fn active(&self) -> Option<&GradeVersion> {
        self.active.and_then(|id| self.get(id))
    }

    /// Looks up a version by id.
    pub fn get(&self, id: VersionId) -> Option<&GradeVersion> {
        self.versions
            .binary_search_by_key(&id, |v| v.id)
            .ok()
            .map(|i| &self.versions[i])
    }

    /// Versions, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GradeVersion> {
        self.versions.iter().rev()
    }

    /// The most recent version.
    pub fn latest(&self) -> Option<&GradeVersion> {
        self.versions.last()
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if nothing has been appended since the last clear.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Drops every version and the active pointer. Ids keep counting up.
    pub fn clear(&mut self) {
        if !self.versions.is_empty() {
            debug!(dropped = self.versions.len(), "cleared history");
        }
        self.versions.clear();
        self.active = None;
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
