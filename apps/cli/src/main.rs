use clap::Parser;
use ctiprd_cli::args::Cli;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ctiprd_cli::app_config(cli.config_path())?;
    let _logger = ctiprd_cli::logging::init(&cli, &config.logging)?;

    let mut out = std::io::stdout().lock();
    ctiprd_cli::run(&cli, &config, &mut out)?;
    out.flush()?;
    Ok(())
}
