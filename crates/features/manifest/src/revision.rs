use crate::error::{ManifestError, ManifestErrorExt};
use crate::model::Manifest;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The shipped manifest revisions, embedded at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Revision {
    /// Copy 2: the first three requirements, no override.
    Initial,
    /// Copy 3: copy 2 plus the header-only override.
    Trimmed,
    /// Copy 1: the manifest the workspace ships with.
    Current,
}

impl Revision {
    pub const ALL: [Self; 3] = [Self::Initial, Self::Trimmed, Self::Current];

    /// Copy number of the revision.
    #[must_use]
    pub const fn copy(self) -> u8 {
        match self {
            Self::Current => 1,
            Self::Initial => 2,
            Self::Trimmed => 3,
        }
    }

    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::Initial => include_str!("../manifests/initial.toml"),
            Self::Trimmed => include_str!("../manifests/trimmed.toml"),
            Self::Current => include_str!("../manifests/current.toml"),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl Manifest {
    /// Parses an embedded revision.
    ///
    /// # Errors
    /// Only if the embedded text is broken, which the test suite rules out.
    pub fn revision(revision: Revision) -> Result<Self, ManifestError> {
        revision.source().parse::<Self>().context(revision.name())
    }
}
