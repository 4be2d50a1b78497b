use crate::record::RecordFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration file of the `ctiprd` binary.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub pool: PoolSettings,
    pub logging: LoggingConfig,
}

/// What to simulate and for how long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Preset name, see `ctiprd systems`.
    pub system: String,
    pub steps: u64,
    pub dt: f64,
    pub seed: u64,
    /// Record a frame every `record_every` steps; `0` disables recording.
    pub record_every: u64,
    pub record: RecordFields,
    /// Independent runs with seeds `seed, seed + 1, ...`.
    pub replicas: usize,
    pub output: Option<PathBuf>,
    /// Overrides of the preset's initial population per type name.
    pub initial: BTreeMap<String, usize>,
}

/// Worker pool settings; unset fields fall back to the pool's own defaults.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub worker_threads: Option<usize>,
    pub stack_size_mib: Option<usize>,
    pub thread_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directives in `RUST_LOG` syntax; overrides `level` when set.
    pub filter: Option<String>,
    /// Directory for rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub rotation: LogRotation,
    pub max_files: usize,
    pub thread_names: bool,
}

// --- Default ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            system: "lotka_volterra".to_owned(),
            steps: 1_000,
            dt: 1e-2,
            seed: 42,
            record_every: 100,
            record: RecordFields::default(),
            replicas: 1,
            output: None,
            initial: BTreeMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            directory: None,
            json: false,
            rotation: LogRotation::default(),
            max_files: 10,
            thread_names: false,
        }
    }
}
