//! The manifest record and its TOML form.

use crate::error::{ManifestError, ManifestErrorExt};
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

/// A pinned third-party library, written `<name>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }

    fn check(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() || self.version.trim().is_empty() || self.name.contains('/') {
            return Err(ManifestError::InvalidRequirement { message: self.to_string().into(), context: None });
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let requirement = s
            .split_once('/')
            .map(|(name, version)| Self::new(name.trim(), version.trim()))
            .ok_or_else(|| ManifestError::InvalidRequirement { message: s.to_owned().into(), context: None })?;
        requirement.check().map_err(|_| ManifestError::InvalidRequirement { message: s.to_owned().into(), context: None })?;
        Ok(requirement)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Build-system output a package manager is asked to emit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Generator {
    Cmake,
    Gcc,
    Txt,
    CmakeFindPackage,
}

/// Dependencies forced into header-only mode before the base configuration runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureOverride {
    #[serde(default)]
    pub header_only: Vec<String>,
}

impl fmt::Display for ConfigureOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "header_only[{}]", self.header_only.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub requires: Vec<Requirement>,
    pub generators: Vec<Generator>,
    pub configure: Option<ConfigureOverride>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    package: RawPackage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    configure: Option<ConfigureOverride>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPackage {
    name: String,
    version: String,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    generators: Vec<Generator>,
}

impl FromStr for Manifest {
    type Err = ManifestError;

    /// Parses and validates a TOML manifest.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawManifest = toml::from_str(s)?;
        let requires = raw.package.requires.iter().map(|r| r.parse()).collect::<Result<Vec<Requirement>, _>>()?;
        let manifest = Self {
            name: raw.package.name,
            version: raw.package.version,
            requires,
            generators: raw.package.generators,
            configure: raw.configure,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}

impl Manifest {
    /// # Errors
    /// [`ManifestError::Io`] if the file cannot be read, otherwise see [`Manifest::from_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(format!("read {}", path.display()))?;
        let manifest = text.parse::<Self>().context(path.display().to_string())?;
        debug!(path = %path.display(), requires = manifest.requires.len(), "Manifest loaded");
        Ok(manifest)
    }

    /// Checks the record's invariants.
    ///
    /// # Errors
    /// * [`ManifestError::Validation`] for an empty name, version or generator list, or an
    ///   override naming an empty package.
    /// * [`ManifestError::InvalidRequirement`] for a requirement with an empty half.
    /// * [`ManifestError::DuplicateRequirement`] if a library is required twice.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(validation("package name is empty"));
        }
        if self.version.trim().is_empty() {
            return Err(validation("package version is empty"));
        }

        let mut seen = FxHashSet::default();
        for requirement in &self.requires {
            requirement.check()?;
            if !seen.insert(requirement.name.as_str()) {
                return Err(ManifestError::DuplicateRequirement {
                    message: requirement.name.clone().into(),
                    context: Some(self.name.clone().into()),
                });
            }
        }

        if self.generators.is_empty() {
            return Err(validation("no generators declared"));
        }
        if let Some(configure) = &self.configure
            && configure.header_only.iter().any(|p| p.trim().is_empty())
        {
            return Err(validation("configure override names an empty package"));
        }
        Ok(())
    }

    /// Deterministic TOML rendering that [`Manifest::from_str`] reads back.
    ///
    /// # Errors
    /// [`ManifestError::Internal`] if the serializer fails.
    pub fn to_toml(&self) -> Result<String, ManifestError> {
        let raw = RawManifest {
            package: RawPackage {
                name: self.name.clone(),
                version: self.version.clone(),
                requires: self.requires.iter().map(ToString::to_string).collect(),
                generators: self.generators.clone(),
            },
            configure: self.configure.clone(),
        };
        toml::to_string(&raw).map_err(|e| ManifestError::Internal {
            message: e.to_string().into(),
            context: Some("serialize manifest".into()),
        })
    }

    /// The requirement on library `name`, if any.
    #[must_use]
    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.requires.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn has_override(&self) -> bool {
        self.configure.as_ref().is_some_and(|c| !c.header_only.is_empty())
    }
}

fn validation(message: &'static str) -> ManifestError {
    ManifestError::Validation { message: message.into(), context: None }
}
