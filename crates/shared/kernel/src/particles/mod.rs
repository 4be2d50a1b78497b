//! Slot-based particle storage.
//!
//! Removing a particle blanks its slot; blanks are reused LIFO by later additions, so slot ids
//! stay stable within a step. Parallel visitors split the slots into
//! [`ThreadPool::granularity`] contiguous chunks and skip blanks.

mod updater;

pub use updater::ParticleCollectionUpdater;

use crate::error::{KernelError, KernelErrorExt};
use crate::pbc::SimulationBox;
use crate::system::System;
use crate::vec::Vector;
use ctiprd_pool::{ThreadPool, partition};
use rand::Rng;
use std::ops::Range;

/// Read-only snapshot of positions and types, shared with parallel force and reaction loops.
#[derive(Debug, Clone, Copy)]
pub struct ParticlesView<'a, const D: usize> {
    positions: &'a [Option<Vector<D>>],
    types: &'a [usize],
}

impl<'a, const D: usize> ParticlesView<'a, D> {
    #[must_use]
    pub fn position(&self, ix: usize) -> Option<&'a Vector<D>> {
        self.positions.get(ix).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn type_of(&self, ix: usize) -> usize {
        self.types[ix]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.positions.len()
    }

    /// `(id, position, type)` of every live particle.
    pub fn iter(self) -> impl Iterator<Item = (usize, &'a Vector<D>, usize)> + 'a {
        let types = self.types;
        self.positions.iter().enumerate().filter_map(move |(ix, p)| p.as_ref().map(|p| (ix, p, types[ix])))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleCollection<const D: usize> {
    positions: Vec<Option<Vector<D>>>,
    forces: Vec<Vector<D>>,
    types: Vec<usize>,
    blanks: Vec<usize>,
}

impl<const D: usize> ParticleCollection<D> {
    #[must_use]
    pub fn new() -> Self {
        Self { positions: Vec::new(), forces: Vec::new(), types: Vec::new(), blanks: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            forces: Vec::with_capacity(capacity),
            types: Vec::with_capacity(capacity),
            blanks: Vec::new(),
        }
    }

    /// Number of slots, blanks included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub const fn n_particles(&self) -> usize {
        self.positions.len() - self.blanks.len()
    }

    #[must_use]
    pub const fn n_blanks(&self) -> usize {
        self.blanks.len()
    }

    /// Stores a particle in the most recently blanked slot, or appends one. Returns its slot.
    pub fn add_particle(&mut self, pos: Vector<D>, ty: usize) -> usize {
        if let Some(ix) = self.blanks.pop() {
            self.positions[ix] = Some(pos);
            self.forces[ix] = Vector::zero();
            self.types[ix] = ty;
            ix
        } else {
            self.positions.push(Some(pos));
            self.forces.push(Vector::zero());
            self.types.push(ty);
            self.positions.len() - 1
        }
    }

    /// # Errors
    /// [`KernelError::UnknownType`] if `system` has no type called `name`.
    pub fn add_particle_named(&mut self, pos: Vector<D>, name: &str, system: &System<D>) -> Result<usize, KernelError> {
        let ty = system.type_id(name)?;
        Ok(self.add_particle(pos, ty))
    }

    /// Blanks slot `ix`; removing a blank or an out-of-range slot is a no-op.
    pub fn remove_particle(&mut self, ix: usize) {
        if let Some(slot) = self.positions.get_mut(ix)
            && slot.take().is_some()
        {
            self.forces[ix] = Vector::zero();
            self.blanks.push(ix);
        }
    }

    #[must_use]
    pub fn exists(&self, ix: usize) -> bool {
        self.positions.get(ix).is_some_and(Option::is_some)
    }

    #[must_use]
    pub fn position(&self, ix: usize) -> Option<&Vector<D>> {
        self.positions.get(ix).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn type_of(&self, ix: usize) -> Option<usize> {
        self.exists(ix).then(|| self.types[ix])
    }

    #[must_use]
    pub fn force(&self, ix: usize) -> Option<&Vector<D>> {
        self.exists(ix).then(|| &self.forces[ix])
    }

    pub fn set_type(&mut self, ix: usize, ty: usize) {
        if self.exists(ix) {
            self.types[ix] = ty;
        }
    }

    pub fn set_position(&mut self, ix: usize, pos: Vector<D>) {
        if let Some(Some(slot)) = self.positions.get_mut(ix) {
            *slot = pos;
        }
    }

    #[must_use]
    pub fn positions(&self) -> &[Option<Vector<D>>] {
        &self.positions
    }

    #[must_use]
    pub fn types(&self) -> &[usize] {
        &self.types
    }

    #[must_use]
    pub fn forces(&self) -> &[Vector<D>] {
        &self.forces
    }

    #[must_use]
    pub fn view(&self) -> ParticlesView<'_, D> {
        ParticlesView { positions: &self.positions, types: &self.types }
    }

    /// `(id, position, type)` of every live particle.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Vector<D>, usize)> {
        self.view().iter()
    }

    /// Live particles per type id; types `>= n_types` are ignored.
    #[must_use]
    pub fn count_by_type(&self, n_types: usize) -> Vec<usize> {
        let mut counts = vec![0; n_types];
        for (_, _, ty) in self.iter() {
            if let Some(c) = counts.get_mut(ty) {
                *c += 1;
            }
        }
        counts
    }

    /// Applies a batch of changes: each addition first fills one of the removed slots,
    /// leftover removals are blanked and leftover additions go through [`Self::add_particle`].
    pub fn update(&mut self, to_add: Vec<(Vector<D>, usize)>, to_remove: Vec<usize>) {
        let mut to_add = to_add.into_iter();
        let mut to_remove = to_remove.into_iter();
        loop {
            match (to_remove.next(), to_add.next()) {
                (Some(ix), Some((pos, ty))) => {
                    if self.exists(ix) {
                        self.positions[ix] = Some(pos);
                        self.forces[ix] = Vector::zero();
                        self.types[ix] = ty;
                    } else {
                        self.add_particle(pos, ty);
                    }
                },
                (Some(ix), None) => self.remove_particle(ix),
                (None, Some((pos, ty))) => {
                    self.add_particle(pos, ty);
                },
                (None, None) => break,
            }
        }
    }

    /// Places `n` particles of type `ty` uniformly inside `sim_box`.
    pub fn initialize_uniform<R: Rng + ?Sized>(&mut self, n: usize, ty: usize, sim_box: &SimulationBox<D>, rng: &mut R) {
        for _ in 0..n {
            let pos = sim_box.uniform_position(rng);
            self.add_particle(pos, ty);
        }
    }

    fn chunks(&self, pool: &ThreadPool) -> Vec<Range<usize>> {
        partition(self.len(), pool.granularity())
    }

    /// Runs `f(id, &mut position, type, &mut force)` on every live particle.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn for_each_particle<F>(&mut self, pool: &ThreadPool, f: F) -> Result<(), KernelError>
    where
        F: Fn(usize, &mut Vector<D>, usize, &mut Vector<D>) + Sync,
    {
        self.for_each_particle_with(pool, |_| (), |_, id, pos, ty, force| f(id, pos, ty, force))
    }

    /// Like [`Self::for_each_particle`], with per-chunk state built by `init(chunk_index)`.
    ///
    /// Chunk boundaries only depend on the number of slots and the pool's granularity.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn for_each_particle_with<S, I, F>(&mut self, pool: &ThreadPool, init: I, f: F) -> Result<(), KernelError>
    where
        I: Fn(usize) -> S + Sync,
        F: Fn(&mut S, usize, &mut Vector<D>, usize, &mut Vector<D>) + Sync,
    {
        let ranges = self.chunks(pool);
        let types = self.types.as_slice();
        let mut positions = self.positions.as_mut_slice();
        let mut forces = self.forces.as_mut_slice();
        let mut jobs = Vec::with_capacity(ranges.len());
        for (chunk, range) in ranges.into_iter().enumerate() {
            let (p_head, p_tail) = positions.split_at_mut(range.len());
            let (f_head, f_tail) = forces.split_at_mut(range.len());
            jobs.push((chunk, range.start, p_head, f_head));
            positions = p_tail;
            forces = f_tail;
        }

        pool.run_scoped(jobs, |(chunk, offset, positions, forces)| {
            let mut state = init(chunk);
            for (i, (pos, force)) in positions.iter_mut().zip(forces.iter_mut()).enumerate() {
                if let Some(pos) = pos {
                    let id = offset + i;
                    f(&mut state, id, pos, types[id], force);
                }
            }
        })
        .context("for_each_particle")
    }

    /// Overwrites every live particle's force with `f(id, &position, type, view)`.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn assign_forces<F>(&mut self, pool: &ThreadPool, f: F) -> Result<(), KernelError>
    where
        F: Fn(usize, &Vector<D>, usize, ParticlesView<'_, D>) -> Vector<D> + Sync,
    {
        let ranges = self.chunks(pool);
        let view = ParticlesView { positions: &self.positions, types: &self.types };
        let mut forces = self.forces.as_mut_slice();
        let mut jobs = Vec::with_capacity(ranges.len());
        for range in ranges {
            let (head, tail) = forces.split_at_mut(range.len());
            jobs.push((range.start, head));
            forces = tail;
        }

        pool.run_scoped(jobs, |(offset, forces)| {
            for (i, force) in forces.iter_mut().enumerate() {
                let id = offset + i;
                *force = view.position(id).map_or_else(Vector::zero, |pos| f(id, pos, view.type_of(id), view));
            }
        })
        .context("assign_forces")
    }

    /// Collects `f(id, &position, type, &force)` over live particles, in slot order.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn map_particles<R, F>(&self, pool: &ThreadPool, f: F) -> Result<Vec<R>, KernelError>
    where
        R: Send,
        F: Fn(usize, &Vector<D>, usize, &Vector<D>) -> R + Sync,
    {
        let chunks = pool
            .map_scoped(self.chunks(pool), |range| {
                range
                    .filter_map(|id| self.positions[id].as_ref().map(|pos| f(id, pos, self.types[id], &self.forces[id])))
                    .collect::<Vec<_>>()
            })
            .context("map_particles")?;
        Ok(chunks.into_iter().flatten().collect())
    }
}
