use anyhow::{Result, bail};
use ctiprd::features::systems::Preset;
use ctiprd::kernel::system::System;
use std::io::Write;

/// One line of `ctiprd systems`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub name: &'static str,
    pub dim: usize,
    pub types: usize,
    pub reactions: usize,
    pub particles: usize,
}

fn summarize<const D: usize>(preset: Preset, system: &System<D>) -> Summary {
    Summary {
        name: preset.name(),
        dim: D,
        types: system.n_types(),
        reactions: system.reactions().len(),
        particles: system.initial().iter().map(|&(_, count)| count).sum(),
    }
}

/// Compiles `preset` in its own dimension and summarizes it.
///
/// # Errors
/// If the preset does not compile.
pub fn summary(preset: Preset) -> Result<Summary> {
    Ok(match preset.dim() {
        2 => summarize(preset, &preset.system::<2>()?),
        3 => summarize(preset, &preset.system::<3>()?),
        dim => bail!("preset {preset} has unsupported dimension {dim}"),
    })
}

pub fn handle(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{:<20} {:>3} {:>5} {:>9} {:>9}", "system", "dim", "types", "reactions", "particles")?;
    for preset in Preset::all() {
        let s = summary(preset)?;
        writeln!(out, "{:<20} {:>3} {:>5} {:>9} {:>9}", s.name, s.dim, s.types, s.reactions, s.particles)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_michaelis_menten_summary() {
        let s = summary(Preset::MichaelisMenten).unwrap();
        assert_eq!(s, Summary { name: "michaelis_menten", dim: 3, types: 4, reactions: 3, particles: 10_000 });
    }

    #[test]
    fn test_lists_every_preset() {
        let mut out = Vec::new();
        handle(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + Preset::names().len());
        for name in Preset::names() {
            assert!(text.contains(name), "{name}");
        }
    }
}
