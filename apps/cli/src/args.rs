//! # CLI Argument Definitions
//!
//! The `ctiprd` command line: manifest inspection, the preset registry and simulation runs.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "ctiprd")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Particle-based reaction-diffusion simulations and the project manifest")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// The main subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The configuration file named on the command line, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Commands::Simulate(args) => args.config.as_deref(),
            Commands::Manifest { .. } | Commands::Systems {} => None,
        }
    }
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect the package manifest and its shipped revisions
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },
    /// List the predefined systems
    Systems {},
    /// Run a predefined system and record its trajectory
    Simulate(SimulateArgs),
}

#[derive(Debug, Subcommand)]
pub enum ManifestAction {
    /// Print the manifest as TOML
    Show(ManifestSource),
    /// Print the ordered resolution plan
    Resolve(ManifestSource),
    /// Compare two manifests (revision names or file paths)
    Diff {
        /// Old side: 'initial', 'trimmed', 'current' or a path
        from: String,
        /// New side: 'initial', 'trimmed', 'current' or a path
        to: String,
    },
    /// Validate a manifest; every shipped revision when no source is given
    Check(ManifestSource),
}

/// Where to read a manifest from; the current revision by default.
#[derive(Debug, Clone, Default, Args)]
pub struct ManifestSource {
    /// Shipped revision: 'initial', 'trimmed' or 'current'
    #[arg(long, value_name = "REVISION", conflicts_with = "file")]
    pub revision: Option<String>,

    /// Manifest file on disk
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Options of `ctiprd simulate`. Unset options fall back to the config file, then to defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    /// Preset name (see `ctiprd systems`)
    pub system: Option<String>,

    /// Number of integration steps
    #[arg(long)]
    pub steps: Option<u64>,

    /// Time step
    #[arg(long)]
    pub dt: Option<f64>,

    /// Seed of the first replica; replica `i` uses `seed + i`
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads of the pool
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Record a frame every N steps (0 disables recording)
    #[arg(long, value_name = "N")]
    pub record_every: Option<u64>,

    /// Trajectory JSON; replicas get a '-<i>' suffix
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML), overridable with CTIPRD__* variables
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Independent runs executed as pool tasks
    #[arg(long, value_name = "N")]
    pub replicas: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_arguments() {
        let cli = Cli::try_parse_from([
            "ctiprd",
            "-vv",
            "simulate",
            "lotka_volterra",
            "--steps",
            "10",
            "--dt",
            "0.5",
            "--replicas",
            "3",
            "--config",
            "sim.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_path(), Some(Path::new("sim.toml")));
        let Commands::Simulate(args) = cli.command else { panic!("expected simulate") };
        assert_eq!(args.system.as_deref(), Some("lotka_volterra"));
        assert_eq!(args.steps, Some(10));
        assert_eq!(args.dt, Some(0.5));
        assert_eq!(args.replicas, Some(3));
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_manifest_source_conflict() {
        let err = Cli::try_parse_from(["ctiprd", "manifest", "show", "--revision", "current", "--file", "x.toml"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["ctiprd", "-q", "-v", "systems"]).is_err());
    }
}
