use crate::args::{ManifestAction, ManifestSource};
use anyhow::{Context, Result};
use ctiprd::features::manifest::{Manifest, Revision, resolve};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub fn handle(action: &ManifestAction, out: &mut impl Write) -> Result<()> {
    match action {
        ManifestAction::Show(source) => {
            let (_, manifest) = load(source)?;
            write!(out, "{}", manifest.to_toml()?)?;
        },
        ManifestAction::Resolve(source) => {
            let (_, manifest) = load(source)?;
            write!(out, "{}", resolve(&manifest))?;
        },
        ManifestAction::Diff { from, to } => {
            let before = operand(from)?;
            let after = operand(to)?;
            writeln!(out, "# {from} -> {to}")?;
            write!(out, "{}", before.diff(&after))?;
        },
        ManifestAction::Check(source) => {
            let checked = if source.revision.is_none() && source.file.is_none() {
                Revision::ALL
                    .iter()
                    .map(|&r| Manifest::revision(r).map(|m| (r.to_string(), m)))
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                vec![load(source)?]
            };
            for (label, manifest) in checked {
                manifest.validate().with_context(|| format!("manifest '{label}'"))?;
                info!(manifest = %label, requires = manifest.requires.len(), "Manifest valid");
                writeln!(out, "ok {label}: {} {} ({} requirements)", manifest.name, manifest.version, manifest.requires.len())?;
            }
        },
    }
    Ok(())
}

/// Reads the manifest `source` points at, labelled for messages.
fn load(source: &ManifestSource) -> Result<(String, Manifest)> {
    if let Some(path) = &source.file {
        return Ok((path.display().to_string(), from_file(path)?));
    }
    let revision = source.revision.as_deref().map_or(Ok(Revision::Current), parse_revision)?;
    Ok((revision.to_string(), Manifest::revision(revision)?))
}

fn operand(operand: &str) -> Result<Manifest> {
    match Revision::from_str(operand) {
        Ok(revision) => Ok(Manifest::revision(revision)?),
        Err(_) => from_file(Path::new(operand)),
    }
}

fn from_file(path: &Path) -> Result<Manifest> {
    Manifest::from_file(path).with_context(|| format!("Failed to load manifest {}", path.display()))
}

fn parse_revision(name: &str) -> Result<Revision> {
    Revision::from_str(name).with_context(|| {
        let known: Vec<_> = Revision::ALL.iter().map(ToString::to_string).collect();
        format!("unknown revision '{name}', expected one of: {}", known.join(", "))
    })
}
