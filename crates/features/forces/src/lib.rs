//! # Force Field
//!
//! Evaluates the potentials of a [`System`] on a [`ParticleCollection`].
//!
//! External potentials are looked up per particle type, pair potentials per unordered
//! [`PairKey`]. Pair interactions are found through a cell-linked [`NeighborList`] whose
//! cutoff is the largest pair cutoff and which only tracks types that take part in a pair
//! potential. Without pair potentials no neighbor list is built.

mod error;

pub use crate::error::{ForceError, ForceErrorExt};
use ctiprd_kernel::hash::{PairKey, PairMap};
use ctiprd_kernel::neighbor_list::NeighborList;
use ctiprd_kernel::particles::{ParticleCollection, ParticlesView};
use ctiprd_kernel::pbc::SimulationBox;
use ctiprd_kernel::pool::ThreadPool;
use ctiprd_kernel::potentials::{ExternalPotential, PairPotential};
use ctiprd_kernel::system::System;
use ctiprd_kernel::vec::Vector;
use tracing::debug;

/// Cells per cutoff length along each axis.
pub const DEFAULT_SUBDIVISIONS: usize = 2;

#[derive(Debug, Clone)]
pub struct ForceField<const D: usize> {
    sim_box: SimulationBox<D>,
    external: Vec<Vec<ExternalPotential<D>>>,
    pair: PairMap<Vec<PairPotential>>,
    neighbor_list: Option<NeighborList<D>>,
}

impl<const D: usize> ForceField<D> {
    /// Builds the lookup tables of `system` with [`DEFAULT_SUBDIVISIONS`].
    ///
    /// # Errors
    /// [`ForceError::Kernel`] if the neighbor list cannot be laid out over the box.
    pub fn new(system: &System<D>) -> Result<Self, ForceError> {
        Self::with_subdivisions(system, DEFAULT_SUBDIVISIONS)
    }

    /// # Errors
    /// [`ForceError::Kernel`] if the neighbor list cannot be laid out over the box.
    pub fn with_subdivisions(system: &System<D>, n_subdivides: usize) -> Result<Self, ForceError> {
        let mut external = vec![Vec::new(); system.n_types()];
        for potential in system.external_potentials() {
            for (ty, slot) in external.iter_mut().enumerate() {
                if potential.applies_to(ty) {
                    slot.push(potential.clone());
                }
            }
        }

        let mut pair: PairMap<Vec<PairPotential>> = PairMap::default();
        for potential in system.pair_potentials() {
            pair.entry(potential.key()).or_default().push(*potential);
        }

        let cutoff = pair.values().flatten().map(PairPotential::cutoff).fold(0., f64::max);
        let neighbor_list = if cutoff > 0. {
            let mut list =
                NeighborList::new(*system.sim_box(), cutoff, n_subdivides).context("pair potential neighbor list")?;
            list.set_types(pair.keys().flat_map(|key| [key.0, key.1]));
            Some(list)
        } else {
            None
        };

        debug!(
            system = system.name(),
            external = system.external_potentials().len(),
            pairs = pair.len(),
            cutoff,
            "Force field assembled"
        );

        Ok(Self { sim_box: *system.sim_box(), external, pair, neighbor_list })
    }

    /// External potentials acting on type `ty`.
    #[must_use]
    pub fn external_potentials(&self, ty: usize) -> &[ExternalPotential<D>] {
        self.external.get(ty).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pair potentials acting between `t1` and `t2`, in either order.
    #[must_use]
    pub fn pair_potentials(&self, t1: usize, t2: usize) -> &[PairPotential] {
        self.pair.get(&PairKey::new(t1, t2)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Interaction range of the pair potentials, `0` without any.
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.neighbor_list.as_ref().map_or(0., NeighborList::cutoff)
    }

    #[must_use]
    pub const fn neighbor_list(&self) -> Option<&NeighborList<D>> {
        self.neighbor_list.as_ref()
    }

    /// Overwrites every live particle's force with the sum of its external forces and the
    /// pair forces exerted by its neighbors.
    ///
    /// # Errors
    /// [`ForceError::Kernel`] if a parallel loop fails.
    pub fn compute(&mut self, particles: &mut ParticleCollection<D>, pool: &ThreadPool) -> Result<(), ForceError> {
        self.refresh(particles.view(), pool)?;
        let this = &*self;
        particles
            .assign_forces(pool, |id, pos, ty, view| {
                let mut force = Vector::zero();
                for potential in this.external_potentials(ty) {
                    force += potential.force(pos);
                }
                this.visit_pairs(id, ty, view, false, |potential, other| {
                    force += potential.force(pos, other, &this.sim_box);
                });
                force
            })
            .context("compute forces")
    }

    /// Total potential energy; each interacting pair is counted once.
    ///
    /// # Errors
    /// [`ForceError::Kernel`] if a parallel loop fails.
    pub fn energy(&mut self, particles: &ParticleCollection<D>, pool: &ThreadPool) -> Result<f64, ForceError> {
        self.refresh(particles.view(), pool)?;
        let this = &*self;
        let view = particles.view();
        let energies = particles
            .map_particles(pool, |id, pos, ty, _| {
                let mut energy: f64 = this.external_potentials(ty).iter().map(|p| p.energy(pos)).sum();
                this.visit_pairs(id, ty, view, true, |potential, other| {
                    energy += potential.energy(pos, other, &this.sim_box);
                });
                energy
            })
            .context("potential energy")?;
        Ok(energies.into_iter().sum())
    }

    fn refresh(&mut self, view: ParticlesView<'_, D>, pool: &ThreadPool) -> Result<(), ForceError> {
        if let Some(list) = self.neighbor_list.as_mut() {
            list.update(view, pool).context("neighbor list update")?;
        }
        Ok(())
    }

    /// Calls `f(potential, neighbor_position)` for every pair potential between `id` and a
    /// neighbor; with `upper_only` only neighbors with a larger id are visited.
    fn visit_pairs<F>(&self, id: usize, ty: usize, view: ParticlesView<'_, D>, upper_only: bool, mut f: F)
    where
        F: FnMut(&PairPotential, &Vector<D>),
    {
        let Some(list) = self.neighbor_list.as_ref() else {
            return;
        };
        if !list.is_allowed_type(ty) {
            return;
        }
        list.for_each_neighbor(id, view, |nid, other, nty| {
            if upper_only && nid < id {
                return;
            }
            for potential in self.pair_potentials(ty, nty) {
                f(potential, other);
            }
        });
    }
}
