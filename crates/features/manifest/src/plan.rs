//! Turns a manifest into the ordered work a package manager would perform.

use crate::model::{Generator, Manifest, Requirement};
use std::fmt;
use std::fmt::Write as _;
use strum_macros::{Display, IntoStaticStr};
use tracing::debug;

/// Header-only is the only option the override hook sets.
pub const HEADER_ONLY: &str = "header_only";

/// Whether a configured package is required directly or pulled in by another requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Dependency {
    Direct,
    Transitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureStep {
    ApplyOption { package: String, option: &'static str, value: bool, dependency: Dependency },
    BaseConfigure,
}

impl fmt::Display for ConfigureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyOption { package, option, value, dependency } => {
                write!(f, "{package}:{option}={value} ({dependency})")
            },
            Self::BaseConfigure => f.write_str("configure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub name: String,
    pub version: String,
    /// Requirements in declaration order.
    pub requests: Vec<Requirement>,
    pub generators: Vec<Generator>,
    /// Empty when the manifest has no override.
    pub steps: Vec<ConfigureStep>,
}

/// Builds the resolution plan of `manifest`. Override steps run after dependency
/// resolution and before the base configuration.
#[must_use]
pub fn resolve(manifest: &Manifest) -> ResolutionPlan {
    let mut steps = Vec::new();
    if let Some(configure) = manifest.configure.as_ref().filter(|c| !c.header_only.is_empty()) {
        steps.extend(configure.header_only.iter().map(|package| {
            let dependency = if manifest.requirement(package).is_some() {
                Dependency::Direct
            } else {
                Dependency::Transitive
            };
            ConfigureStep::ApplyOption { package: package.clone(), option: HEADER_ONLY, value: true, dependency }
        }));
        steps.push(ConfigureStep::BaseConfigure);
    }

    debug!(
        manifest = %manifest.name,
        requests = manifest.requires.len(),
        steps = steps.len(),
        "Manifest resolved"
    );

    ResolutionPlan {
        name: manifest.name.clone(),
        version: manifest.version.clone(),
        requests: manifest.requires.clone(),
        generators: manifest.generators.clone(),
        steps,
    }
}

impl ResolutionPlan {
    #[must_use]
    pub fn has_override(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Packages the plan switches to header-only mode, in step order.
    #[must_use]
    pub fn header_only_packages(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                ConfigureStep::ApplyOption { package, option: HEADER_ONLY, value: true, .. } => {
                    Some(package.as_str())
                },
                _ => None,
            })
            .collect()
    }

    /// Lockfile-like text. Equal plans render to identical strings.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {} {}", self.name, self.version);
        out.push_str("[requires]\n");
        for (i, request) in self.requests.iter().enumerate() {
            let _ = writeln!(out, "{} = \"{}\"  # {}", request.name, request.version, i + 1);
        }
        out.push_str("[generators]\n");
        for generator in &self.generators {
            let _ = writeln!(out, "{generator}");
        }
        out.push_str("[steps]\n");
        for step in &self.steps {
            let _ = writeln!(out, "{step}");
        }
        out
    }
}

impl fmt::Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
