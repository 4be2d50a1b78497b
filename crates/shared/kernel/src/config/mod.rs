use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `CTIPRD__SIMULATION__STEPS=500`.
pub const ENV_PREFIX: &str = "CTIPRD";
const DEFAULT_CONFIG: &str = "ctiprd";

/// Custom error type for config loading.
#[ctiprd_derive::ctiprd_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `ctiprd.toml`). If no path is provided, it defaults to `"ctiprd"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `CTIPRD__`.
///    Nested structures are accessed using double underscores (e.g., `CTIPRD__SIMULATION__DT` maps to `simulation.dt`).
///
/// # Type Parameters
/// * `T`: The target configuration structure. Must implement [`serde::Deserialize`].
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use ctiprd_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     steps: u64,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake));

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctiprd_domain::config::AppConfig;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[simulation]\nsystem = \"double_well\"\nsteps = 12\n\n[pool]\nworker_threads = 2").unwrap();

        let cfg: AppConfig = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.simulation.system, "double_well");
        assert_eq!(cfg.simulation.steps, 12);
        assert_eq!(cfg.pool.worker_threads, Some(2));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    #[serial]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config::<AppConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.context_message(), Some("Failed to build config"));
    }
}
