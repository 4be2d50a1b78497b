use crate::args::SimulateArgs;
use anyhow::{Context, Result, bail, ensure};
use ctiprd::domain::config::{AppConfig, PoolSettings, SimulationConfig};
use ctiprd::features::integrator::{EulerMaruyama, Trajectory};
use ctiprd::features::systems::Preset;
use ctiprd::pool::{PoolConfig, ThreadPool};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const MIB: usize = 1024 * 1024;
/// Progress lines per run.
const PROGRESS_LINES: u64 = 10;

/// Result of one replica.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub replica: usize,
    pub seed: u64,
    pub steps: u64,
    pub time: f64,
    /// Final population per type name.
    pub counts: Vec<(String, usize)>,
    pub frames: usize,
    pub output: Option<PathBuf>,
}

/// Layers the command-line options over the `[simulation]` section.
#[must_use]
pub fn settings(args: &SimulateArgs, config: &SimulationConfig) -> SimulationConfig {
    let mut settings = config.clone();
    if let Some(system) = &args.system {
        settings.system.clone_from(system);
    }
    if let Some(steps) = args.steps {
        settings.steps = steps;
    }
    if let Some(dt) = args.dt {
        settings.dt = dt;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(record_every) = args.record_every {
        settings.record_every = record_every;
    }
    if let Some(replicas) = args.replicas {
        settings.replicas = replicas;
    }
    if args.output.is_some() {
        settings.output.clone_from(&args.output);
    }
    settings
}

#[must_use]
pub fn pool_config(settings: &PoolSettings, workers: Option<usize>) -> PoolConfig {
    let mut config = PoolConfig::default();
    if let Some(threads) = workers.or(settings.worker_threads) {
        config = config.with_worker_threads(threads);
    }
    if let Some(mib) = settings.stack_size_mib {
        config = config.with_stack_size(mib.saturating_mul(MIB));
    }
    if let Some(name) = &settings.thread_name {
        config = config.with_thread_name(name.clone());
    }
    config
}

/// Output file of `replica`; a lone run writes to `path` itself.
#[must_use]
pub fn replica_path(path: &Path, replica: usize, replicas: usize) -> PathBuf {
    if replicas <= 1 {
        return path.to_path_buf();
    }
    let stem = path.file_stem().map_or_else(|| "trajectory".to_owned(), |s| s.to_string_lossy().into_owned());
    let extension = path.extension().map_or_else(|| "json".to_owned(), |e| e.to_string_lossy().into_owned());
    path.with_file_name(format!("{stem}-{replica}.{extension}"))
}

/// Runs every replica of the configured simulation and prints one summary line each.
///
/// # Errors
/// Unknown presets, invalid settings, and any integration or output failure.
pub fn handle(args: &SimulateArgs, config: &AppConfig, out: &mut impl Write) -> Result<Vec<Outcome>> {
    let settings = settings(args, &config.simulation);
    let preset = Preset::from_name(&settings.system)?;
    ensure!(settings.dt > 0. && settings.dt.is_finite(), "dt must be positive and finite, got {}", settings.dt);
    ensure!(settings.replicas > 0, "replicas must be at least 1");

    let pool = Arc::new(ThreadPool::new(&pool_config(&config.pool, args.workers)).context("Failed to start the worker pool")?);
    info!(
        system = preset.name(),
        dim = preset.dim(),
        steps = settings.steps,
        dt = settings.dt,
        seed = settings.seed,
        replicas = settings.replicas,
        workers = pool.size(),
        "Simulation started"
    );

    let outcomes = match preset.dim() {
        2 => run_replicas::<2>(preset, &settings, &pool)?,
        3 => run_replicas::<3>(preset, &settings, &pool)?,
        dim => bail!("preset {preset} has unsupported dimension {dim}"),
    };

    for outcome in &outcomes {
        let counts: Vec<_> = outcome.counts.iter().map(|(name, count)| format!("{name}={count}")).collect();
        write!(out, "replica {} seed {} t={:.4} {}", outcome.replica, outcome.seed, outcome.time, counts.join(" "))?;
        match &outcome.output {
            Some(path) => writeln!(out, " -> {} ({} frames)", path.display(), outcome.frames)?,
            None => writeln!(out)?,
        }
    }
    Ok(outcomes)
}

fn run_replicas<const D: usize>(
    preset: Preset,
    settings: &SimulationConfig,
    pool: &Arc<ThreadPool>,
) -> Result<Vec<Outcome>> {
    if settings.replicas == 1 {
        return Ok(vec![run_replica::<D>(preset, settings, 0, Arc::clone(pool))?]);
    }

    // Replica tasks occupy workers; their particle loops run on scoped threads.
    let handles: Vec<_> = (0..settings.replicas)
        .map(|replica| {
            let settings = settings.clone();
            let shared = Arc::clone(pool);
            pool.push(move || run_replica::<D>(preset, &settings, replica, shared))
        })
        .collect();

    handles
        .into_iter()
        .enumerate()
        .map(|(replica, handle)| handle.wait().with_context(|| format!("replica {replica}"))?)
        .collect()
}

fn run_replica<const D: usize>(
    preset: Preset,
    settings: &SimulationConfig,
    replica: usize,
    pool: Arc<ThreadPool>,
) -> Result<Outcome> {
    let seed = settings.seed.wrapping_add(replica as u64);
    let mut system = preset.system::<D>()?;
    for (name, &count) in &settings.initial {
        system.set_initial(name, count).with_context(|| format!("initial population of '{name}'"))?;
    }

    let mut integrator = EulerMaruyama::new(system, pool, seed)?;
    integrator.populate();

    let mut trajectory = Trajectory::new(integrator.system(), settings.record);
    let record_every = settings.record_every;
    if record_every > 0 {
        trajectory.record(&integrator, integrator.pool())?;
    }

    let progress = (settings.steps / PROGRESS_LINES).max(1);
    let started = Instant::now();
    integrator.run(settings.steps, settings.dt, |report, integrator| {
        if record_every > 0 && report.step % record_every == 0 {
            trajectory.record(integrator, integrator.pool())?;
        }
        if report.step % progress == 0 {
            info!(
                replica,
                step = report.step,
                time = report.time,
                particles = report.n_particles,
                reactions = report.reactions.performed,
                "Progress"
            );
        }
        Ok(())
    })?;
    debug!(replica, elapsed_ms = started.elapsed().as_millis(), "Replica finished");

    let system = integrator.system();
    let counts = integrator
        .particles()
        .count_by_type(system.n_types())
        .into_iter()
        .enumerate()
        .map(|(ty, count)| (system.type_name(ty).unwrap_or_default().to_owned(), count))
        .collect();

    let output = settings.output.as_deref().map(|path| replica_path(path, replica, settings.replicas));
    if let Some(path) = &output {
        trajectory.write(path)?;
        info!(replica, path = %path.display(), frames = trajectory.len(), "Trajectory written");
    }

    Ok(Outcome {
        replica,
        seed,
        steps: integrator.steps(),
        time: integrator.time(),
        counts,
        frames: trajectory.len(),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(system: &str, steps: u64) -> SimulateArgs {
        SimulateArgs {
            system: Some(system.to_owned()),
            steps: Some(steps),
            dt: Some(0.01),
            seed: Some(3),
            workers: Some(2),
            ..SimulateArgs::default()
        }
    }

    #[test]
    fn test_command_line_overrides_config() {
        let config = SimulationConfig { steps: 500, record_every: 7, ..SimulationConfig::default() };
        let merged = settings(&args("double_well", 20), &config);
        assert_eq!(merged.system, "double_well");
        assert_eq!(merged.steps, 20);
        assert_eq!(merged.seed, 3);
        assert_eq!(merged.record_every, 7);
        assert_eq!(merged.replicas, 1);
    }

    #[test]
    fn test_pool_config_precedence() {
        let settings = PoolSettings { worker_threads: Some(6), stack_size_mib: Some(4), thread_name: Some("sim".into()) };
        let config = pool_config(&settings, Some(3));
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.stack_size, 4 * MIB);
        assert_eq!(config.thread_name, "sim");
        assert_eq!(pool_config(&settings, None).worker_threads, 6);
    }

    #[test]
    fn test_replica_paths() {
        let path = Path::new("out/traj.json");
        assert_eq!(replica_path(path, 0, 1), PathBuf::from("out/traj.json"));
        assert_eq!(replica_path(path, 2, 4), PathBuf::from("out/traj-2.json"));
    }

    #[test]
    fn test_rejects_bad_settings() {
        let config = AppConfig::default();
        let mut bad = args("double_well", 1);
        bad.dt = Some(0.);
        assert!(handle(&bad, &config, &mut Vec::new()).is_err());
        assert!(handle(&args("brusselator", 1), &config, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_replicas_are_seeded_apart() {
        let mut config = AppConfig::default();
        config.simulation.initial.insert("prey".into(), 30);
        config.simulation.initial.insert("predator".into(), 20);
        let mut run = args("lotka_volterra", 5);
        run.replicas = Some(2);
        run.record_every = Some(0);

        let outcomes = handle(&run, &config, &mut Vec::new()).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].seed, 3);
        assert_eq!(outcomes[1].seed, 4);
        assert!(outcomes.iter().all(|o| o.steps == 5 && o.frames == 0 && o.output.is_none()));
        assert_eq!(outcomes[0].counts[0].0, "predator");
    }
}
