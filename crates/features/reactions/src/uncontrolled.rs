//! The uncontrolled approximation.
//!
//! Every step each particle (and each close pair) independently proposes the reactions that
//! fire over `tau`. The proposals are shuffled and applied one by one; a particle taken by an
//! earlier event makes every later event that needs it fail.

use crate::error::{ReactionError, ReactionErrorExt};
use crate::events::{ReactionEvent, apply_event};
use ctiprd_kernel::hash::{PairKey, PairMap};
use ctiprd_kernel::neighbor_list::NeighborList;
use ctiprd_kernel::particles::{ParticleCollection, ParticleCollectionUpdater, ParticlesView};
use ctiprd_kernel::pbc::SimulationBox;
use ctiprd_kernel::pool::{ThreadPool, partition};
use ctiprd_kernel::random::stream;
use ctiprd_kernel::reactions::{Reaction, fires, reaction_radius};
use ctiprd_kernel::system::System;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Cells per reaction radius along each axis.
pub const DEFAULT_SUBDIVISIONS: usize = 2;

/// Outcome of one reaction step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionReport {
    /// Events that fired.
    pub proposed: usize,
    /// Events that were applied without conflict.
    pub performed: usize,
}

#[derive(Debug, Clone)]
pub struct UncontrolledApproximation<const D: usize> {
    sim_box: SimulationBox<D>,
    reactions: Vec<Reaction>,
    first_order: Vec<Vec<usize>>,
    second_order: PairMap<Vec<usize>>,
    neighbor_list: Option<NeighborList<D>>,
    seed: u64,
    step: u64,
    rng: StdRng,
}

impl<const D: usize> UncontrolledApproximation<D> {
    /// # Errors
    /// [`ReactionError::Kernel`] if the neighbor list cannot be laid out over the box.
    pub fn new(system: &System<D>, seed: u64) -> Result<Self, ReactionError> {
        Self::with_subdivisions(system, seed, DEFAULT_SUBDIVISIONS)
    }

    /// # Errors
    /// [`ReactionError::Kernel`] if the neighbor list cannot be laid out over the box.
    pub fn with_subdivisions(system: &System<D>, seed: u64, n_subdivides: usize) -> Result<Self, ReactionError> {
        let reactions = system.reactions().to_vec();
        let mut first_order = vec![Vec::new(); system.n_types()];
        let mut second_order: PairMap<Vec<usize>> = PairMap::default();
        for (ix, reaction) in reactions.iter().enumerate() {
            match *reaction {
                Reaction::Decay { educt, .. } | Reaction::Conversion { educt, .. } | Reaction::Fission { educt, .. } => {
                    if let Some(slot) = first_order.get_mut(educt) {
                        slot.push(ix);
                    }
                },
                Reaction::Fusion { educt1, educt2, .. } => {
                    second_order.entry(PairKey::new(educt1, educt2)).or_default().push(ix);
                },
                Reaction::Catalysis { catalyst, educt, .. } => {
                    second_order.entry(PairKey::new(catalyst, educt)).or_default().push(ix);
                },
            }
        }

        let radius = reaction_radius(&reactions);
        let neighbor_list = if radius > 0. {
            let mut list =
                NeighborList::new(*system.sim_box(), radius, n_subdivides).context("reaction neighbor list")?;
            list.set_types(second_order.keys().flat_map(|key| [key.0, key.1]));
            Some(list)
        } else {
            None
        };

        trace!(
            system = system.name(),
            reactions = reactions.len(),
            pairs = second_order.len(),
            radius,
            "Reaction handler assembled"
        );

        Ok(Self {
            sim_box: *system.sim_box(),
            reactions,
            first_order,
            second_order,
            neighbor_list,
            seed,
            step: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Largest reaction radius, `0` without second-order reactions.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.neighbor_list.as_ref().map_or(0., NeighborList::cutoff)
    }

    #[must_use]
    pub const fn neighbor_list(&self) -> Option<&NeighborList<D>> {
        self.neighbor_list.as_ref()
    }

    /// Collects the events that fire over `tau`, in slot order.
    ///
    /// Each chunk of slots draws from its own stream derived from the seed and the step
    /// counter, so the proposals do not depend on how chunks are scheduled.
    ///
    /// # Errors
    /// [`ReactionError::Pool`] / [`ReactionError::Kernel`] if a parallel loop fails.
    pub fn propose(
        &mut self,
        particles: &ParticleCollection<D>,
        tau: f64,
        pool: &ThreadPool,
    ) -> Result<Vec<ReactionEvent>, ReactionError> {
        let view = particles.view();
        if let Some(list) = self.neighbor_list.as_mut() {
            list.update(view, pool).context("reaction neighbor list update")?;
        }
        let step = self.step;
        self.step += 1;

        let this = &*self;
        let jobs: Vec<_> = partition(view.len(), pool.granularity()).into_iter().enumerate().collect();
        let chunks = pool
            .map_scoped(jobs, |(chunk, range)| {
                let mut rng = stream(this.seed, step, chunk);
                let mut events = Vec::new();
                for id in range {
                    this.propose_for(id, view, tau, &mut rng, &mut events);
                }
                events
            })
            .context("propose reactions")?;
        Ok(chunks.into_iter().flatten().collect())
    }

    fn propose_for<R: Rng>(
        &self,
        id: usize,
        view: ParticlesView<'_, D>,
        tau: f64,
        rng: &mut R,
        events: &mut Vec<ReactionEvent>,
    ) {
        let Some(pos) = view.position(id) else {
            return;
        };
        let ty = view.type_of(id);

        for &reaction in self.first_order.get(ty).into_iter().flatten() {
            if fires(self.reactions[reaction].rate(), tau, rng.random()) {
                events.push(ReactionEvent::Single { reaction, id });
            }
        }

        let Some(list) = self.neighbor_list.as_ref() else {
            return;
        };
        if !list.is_allowed_type(ty) {
            return;
        }
        list.for_each_neighbor(id, view, |nid, other, nty| {
            if nid <= id {
                return;
            }
            let Some(candidates) = self.second_order.get(&PairKey::new(ty, nty)) else {
                return;
            };
            let distance_squared = self.sim_box.distance_squared(pos, other);
            for &reaction in candidates {
                let r = self.reactions[reaction];
                let radius = r.radius().unwrap_or(0.);
                if r.matches_pair(ty, nty) && distance_squared < radius * radius && fires(r.rate(), tau, rng.random()) {
                    events.push(ReactionEvent::Pair { reaction, id1: id, id2: nid });
                }
            }
        });
    }

    /// Shuffles `events` and applies them in that order; returns how many were applied.
    pub fn apply(&mut self, particles: &mut ParticleCollection<D>, mut events: Vec<ReactionEvent>) -> usize {
        events.shuffle(&mut self.rng);
        let sim_box = self.sim_box;
        let mut updater = ParticleCollectionUpdater::new(particles, &sim_box);
        let mut performed = 0;
        for event in events {
            if apply_event(event, &self.reactions, &mut updater, &mut self.rng) {
                performed += 1;
            }
        }
        updater.finish();
        performed
    }

    /// One reaction step over `tau`: propose, shuffle, apply.
    ///
    /// # Errors
    /// See [`UncontrolledApproximation::propose`].
    pub fn perform(
        &mut self,
        particles: &mut ParticleCollection<D>,
        tau: f64,
        pool: &ThreadPool,
    ) -> Result<ReactionReport, ReactionError> {
        if self.reactions.is_empty() {
            return Ok(ReactionReport::default());
        }
        let events = self.propose(particles, tau, pool)?;
        let proposed = events.len();
        let performed = self.apply(particles, events);
        trace!(step = self.step, proposed, performed, "Reactions applied");
        Ok(ReactionReport { proposed, performed })
    }
}
