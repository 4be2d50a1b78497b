//! Maps the `[logging]` config section and the global flags onto the logger builder.

use crate::args::Cli;
use ctiprd::domain::config::{LogRotation, LoggingConfig};
use ctiprd_logger::{LevelFilter, Logger, LoggerError, Rotation};
use std::str::FromStr;

/// Prefix of rolled log files.
pub const LOG_NAME: &str = "ctiprd";

/// `-v`/`-q` win over the configured level.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] if the configured level is not a level name.
pub fn level(cli: &Cli, config: &LoggingConfig) -> Result<LevelFilter, LoggerError> {
    if cli.quiet || cli.verbose > 0 {
        return Ok(ctiprd_logger::level_from_verbosity(cli.quiet, cli.verbose));
    }
    LevelFilter::from_str(config.level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("logging.level '{}': {e}", config.level).into(),
        context: None,
    })
}

#[must_use]
pub const fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

/// Installs the global subscriber.
///
/// # Errors
/// See [`ctiprd_logger::LoggerBuilder::init`].
pub fn init(cli: &Cli, config: &LoggingConfig) -> Result<Logger, LoggerError> {
    let builder = Logger::builder()
        .name(LOG_NAME)
        .console(true)
        .level(level(cli, config)?)
        .thread_names(config.thread_names);
    let builder = match &config.filter {
        Some(filter) => builder.env_filter(filter.clone()),
        None => builder,
    };

    match cli.log_dir.as_ref().or(config.directory.as_ref()) {
        Some(directory) => {
            let builder =
                builder.path(directory.clone()).rotation(rotation(config.rotation)).max_files(config.max_files);
            if config.json { builder.json().init() } else { builder.init() }
        },
        None => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ctiprd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_config_level() {
        let config = LoggingConfig { level: "error".into(), ..LoggingConfig::default() };
        assert_eq!(level(&cli(&["systems"]), &config).unwrap(), LevelFilter::ERROR);
        assert_eq!(level(&cli(&["-v", "systems"]), &config).unwrap(), LevelFilter::DEBUG);
        assert_eq!(level(&cli(&["-q", "systems"]), &config).unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn test_bad_level_is_rejected() {
        let config = LoggingConfig { level: "loud".into(), ..LoggingConfig::default() };
        assert!(matches!(level(&cli(&["systems"]), &config), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_rotation_mapping() {
        assert_eq!(rotation(LogRotation::Hourly), Rotation::HOURLY);
        assert_eq!(rotation(LogRotation::default()), Rotation::DAILY);
    }
}
