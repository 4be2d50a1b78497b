//! Revision-to-revision comparison.

use crate::model::{ConfigureOverride, Generator, Manifest, Requirement};
use std::fmt;

/// A library whose version changed between two manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repin {
    pub name: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub added: Vec<Requirement>,
    pub removed: Vec<Requirement>,
    pub repinned: Vec<Repin>,
    pub generators_added: Vec<Generator>,
    pub generators_removed: Vec<Generator>,
    /// `Some((before, after))` when the configure override changed.
    pub configure: Option<(Option<ConfigureOverride>, Option<ConfigureOverride>)>,
}

impl ManifestDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.repinned.is_empty()
            && self.generators_added.is_empty()
            && self.generators_removed.is_empty()
            && self.configure.is_none()
    }
}

impl Manifest {
    /// Changes needed to turn `self` into `other`. Entries keep declaration order.
    #[must_use]
    pub fn diff(&self, other: &Self) -> ManifestDiff {
        let mut diff = ManifestDiff::default();

        for requirement in &other.requires {
            match self.requirement(&requirement.name) {
                None => diff.added.push(requirement.clone()),
                Some(old) if old.version != requirement.version => diff.repinned.push(Repin {
                    name: requirement.name.clone(),
                    from: old.version.clone(),
                    to: requirement.version.clone(),
                }),
                Some(_) => {},
            }
        }
        diff.removed =
            self.requires.iter().filter(|r| other.requirement(&r.name).is_none()).cloned().collect();

        diff.generators_added = other.generators.iter().filter(|g| !self.generators.contains(g)).copied().collect();
        diff.generators_removed = self.generators.iter().filter(|g| !other.generators.contains(g)).copied().collect();

        if self.configure != other.configure {
            diff.configure = Some((self.configure.clone(), other.configure.clone()));
        }
        diff
    }
}

impl fmt::Display for ManifestDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no changes");
        }
        for requirement in &self.added {
            writeln!(f, "+ {requirement}")?;
        }
        for requirement in &self.removed {
            writeln!(f, "- {requirement}")?;
        }
        for repin in &self.repinned {
            writeln!(f, "~ {} {} -> {}", repin.name, repin.from, repin.to)?;
        }
        for generator in &self.generators_added {
            writeln!(f, "+ generator {generator}")?;
        }
        for generator in &self.generators_removed {
            writeln!(f, "- generator {generator}")?;
        }
        if let Some((before, after)) = &self.configure {
            let show = |c: &Option<ConfigureOverride>| c.as_ref().map_or_else(|| "none".to_owned(), ToString::to_string);
            writeln!(f, "~ configure {} -> {}", show(before), show(after))?;
        }
        Ok(())
    }
}
