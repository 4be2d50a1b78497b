//! The `ctiprd` command line.
//!
//! Argument parsing lives in [`args`], logger setup in [`logging`] and one handler per
//! subcommand in [`handlers`]. Handlers write their report to any [`Write`] so they can be
//! exercised without a terminal.

pub mod args;
pub mod handlers;
pub mod logging;

use crate::args::{Cli, Commands};
use anyhow::{Context, Result};
use ctiprd::domain::config::AppConfig;
use ctiprd::kernel::config::load_config;
use std::io::Write;
use std::path::Path;

/// Loads the configuration file, or the defaults when none is given.
///
/// # Errors
/// If the file is missing or malformed.
pub fn app_config(path: Option<&Path>) -> Result<AppConfig> {
    path.map_or_else(
        || Ok(AppConfig::default()),
        |path| load_config(Some(path)).with_context(|| format!("Configuration {} is malformed", path.display())),
    )
}

/// Executes the parsed command.
///
/// # Errors
/// Whatever the selected handler reports.
pub fn run(cli: &Cli, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Manifest { action } => handlers::manifest::handle(action, out)?,
        Commands::Systems {} => handlers::systems::handle(out)?,
        Commands::Simulate(args) => {
            handlers::simulate::handle(args, config, out)?;
        },
    }
    Ok(())
}
