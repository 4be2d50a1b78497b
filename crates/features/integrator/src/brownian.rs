//! Overdamped Langevin dynamics of a particle system.
//!
//! One step of size `h`:
//!
//! 1. forces are evaluated from the force field,
//! 2. every particle moves by `F D h / kBT + sqrt(2 D h) xi` and is wrapped into the box,
//! 3. reactions are performed over `tau = h`.

use crate::error::{IntegratorError, IntegratorErrorExt};
use ctiprd_forces::ForceField;
use ctiprd_kernel::hash::hash_combine;
use ctiprd_kernel::particles::ParticleCollection;
use ctiprd_kernel::pool::ThreadPool;
use ctiprd_kernel::random::{normal_vector, stream};
use ctiprd_kernel::system::System;
use ctiprd_reactions::{ReactionReport, UncontrolledApproximation};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, trace};

const DIFFUSION_STREAM: u64 = 0x6469_6666;
const REACTION_STREAM: u64 = 0x7265_6163;
const PLACEMENT_STREAM: u64 = 0x706c_6163;

/// Outcome of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Number of completed steps, this one included.
    pub step: u64,
    /// Simulation time after the step.
    pub time: f64,
    pub reactions: ReactionReport,
    /// Live particles after the step.
    pub n_particles: usize,
}

#[derive(Debug)]
pub struct EulerMaruyama<const D: usize> {
    system: System<D>,
    particles: ParticleCollection<D>,
    forces: ForceField<D>,
    reactions: UncontrolledApproximation<D>,
    pool: Arc<ThreadPool>,
    seed: u64,
    step: u64,
    time: f64,
}

impl<const D: usize> EulerMaruyama<D> {
    /// Creates an integrator with an empty particle collection.
    ///
    /// # Errors
    /// [`IntegratorError::Forces`] / [`IntegratorError::Reactions`] if the neighbor lists
    /// cannot be laid out over the system's box.
    pub fn new(system: System<D>, pool: Arc<ThreadPool>, seed: u64) -> Result<Self, IntegratorError> {
        let forces = ForceField::new(&system).context("force field")?;
        let reactions =
            UncontrolledApproximation::new(&system, hash_combine(seed, REACTION_STREAM)).context("reaction handler")?;
        debug!(
            system = system.name(),
            dim = D,
            seed,
            workers = pool.size(),
            pair_cutoff = forces.cutoff(),
            reaction_radius = reactions.radius(),
            "Integrator ready"
        );
        Ok(Self {
            system,
            particles: ParticleCollection::new(),
            forces,
            reactions,
            pool,
            seed,
            step: 0,
            time: 0.,
        })
    }

    /// Places the system's initial population uniformly in the box.
    pub fn populate(&mut self) {
        let mut rng = StdRng::seed_from_u64(hash_combine(self.seed, PLACEMENT_STREAM));
        self.system.populate(&mut self.particles, &mut rng);
        debug!(particles = self.particles.n_particles(), "Initial particles placed");
    }

    /// Advances the system by `h`.
    ///
    /// # Errors
    /// [`IntegratorError::InvalidStep`] for a non-positive or non-finite `h`, otherwise the
    /// error of the failing force, diffusion or reaction stage.
    pub fn step(&mut self, h: f64) -> Result<StepReport, IntegratorError> {
        if !(h > 0. && h.is_finite()) {
            return Err(IntegratorError::InvalidStep {
                message: format!("step size must be positive and finite, got {h}").into(),
                context: None,
            });
        }

        self.forces.compute(&mut self.particles, &self.pool)?;
        self.diffuse(h)?;
        let reactions = self.reactions.perform(&mut self.particles, h, &self.pool)?;

        self.step += 1;
        self.time += h;
        let report = StepReport { step: self.step, time: self.time, reactions, n_particles: self.particles.n_particles() };
        trace!(step = report.step, particles = report.n_particles, performed = reactions.performed, "Step done");
        Ok(report)
    }

    /// Runs `n_steps` steps, calling `observe` after each one.
    ///
    /// # Errors
    /// See [`EulerMaruyama::step`].
    pub fn run<F>(&mut self, n_steps: u64, h: f64, mut observe: F) -> Result<(), IntegratorError>
    where
        F: FnMut(&StepReport, &Self) -> Result<(), IntegratorError>,
    {
        for _ in 0..n_steps {
            let report = self.step(h)?;
            observe(&report, self)?;
        }
        Ok(())
    }

    fn diffuse(&mut self, h: f64) -> Result<(), IntegratorError> {
        let system = &self.system;
        let kbt = system.kbt();
        let sim_box = *system.sim_box();
        let diffusion: Vec<f64> = system.types().iter().map(|t| t.diffusion_constant).collect();
        let (seed, step) = (hash_combine(self.seed, DIFFUSION_STREAM), self.step);

        self.particles
            .for_each_particle_with(
                &self.pool,
                |chunk| stream(seed, step, chunk),
                |rng, _, pos, ty, force| {
                    let d = diffusion.get(ty).copied().unwrap_or(0.);
                    let noise = normal_vector::<D, _>(rng) * (2. * d * h).sqrt();
                    *pos += *force * (d * h / kbt) + noise;
                    sim_box.wrap(pos);
                },
            )
            .context("diffusion")
    }

    #[must_use]
    pub const fn particles(&self) -> &ParticleCollection<D> {
        &self.particles
    }

    pub const fn particles_mut(&mut self) -> &mut ParticleCollection<D> {
        &mut self.particles
    }

    #[must_use]
    pub const fn system(&self) -> &System<D> {
        &self.system
    }

    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Completed steps.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.step
    }

    #[must_use]
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    #[must_use]
    pub const fn force_field(&self) -> &ForceField<D> {
        &self.forces
    }

    #[must_use]
    pub const fn reactions(&self) -> &UncontrolledApproximation<D> {
        &self.reactions
    }

    /// Total potential energy of the current configuration.
    ///
    /// # Errors
    /// [`IntegratorError::Forces`] if a parallel loop fails.
    pub fn energy(&mut self) -> Result<f64, IntegratorError> {
        Ok(self.forces.energy(&self.particles, &self.pool)?)
    }
}
