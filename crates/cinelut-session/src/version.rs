//! Immutable grade versions.

use cinelut_color::GradeParams;
use std::fmt;

/// Label used for reference-match provenance.
pub const REFERENCE_MATCH_LABEL: &str = "Reference Match";

/// Version identifier. Ids only ever grow within a session, even across
/// [`History::clear`](crate::History::clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionId(u64);

impl VersionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What produced a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A style prompt.
    Prompt(String),
    /// Matching a reference image.
    Reference,
}

impl Provenance {
    /// Human-readable provenance text.
    pub fn label(&self) -> &str {
        match self {
            Self::Prompt(text) => text,
            Self::Reference => REFERENCE_MATCH_LABEL,
        }
    }
}

/// One generated grade. Fields are set once on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeVersion {
    pub(crate) id: VersionId,
    pub(crate) created_at: u64,
    pub(crate) provenance: Provenance,
    pub(crate) display_name: String,
    pub(crate) params: GradeParams,
    pub(crate) is_fallback: bool,
}

impl GradeVersion {
    /// Unique id.
    pub fn id(&self) -> VersionId {
        self.id
    }

    /// Creation time, milliseconds since the Unix epoch. Strictly increasing
    /// within a history.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// What produced this version.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Derived name, e.g. `Warm_Vintage_v2`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The (clamped) grade.
    pub fn params(&self) -> &GradeParams {
        &self.params
    }

    /// `true` when generation failed and this holds the neutral fallback.
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }
}
