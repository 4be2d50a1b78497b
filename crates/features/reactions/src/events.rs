//! Reaction events and their effect on the particle collection.

use ctiprd_kernel::particles::ParticleCollectionUpdater;
use ctiprd_kernel::random::unit_vector;
use ctiprd_kernel::reactions::Reaction;
use rand::Rng;

/// A reaction proposed for one particle or one particle pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionEvent {
    /// First-order `reaction` on particle `id`.
    Single { reaction: usize, id: usize },
    /// Second-order `reaction` between `id1 < id2`.
    Pair { reaction: usize, id1: usize, id2: usize },
}

impl ReactionEvent {
    #[must_use]
    pub const fn reaction(&self) -> usize {
        match *self {
            Self::Single { reaction, .. } | Self::Pair { reaction, .. } => reaction,
        }
    }
}

/// Applies `event` through the updater; `false` if one of its particles was already taken
/// by an earlier event of the same step.
pub fn apply_event<const D: usize, R: Rng + ?Sized>(
    event: ReactionEvent,
    reactions: &[Reaction],
    updater: &mut ParticleCollectionUpdater<'_, D>,
    rng: &mut R,
) -> bool {
    let Some(reaction) = reactions.get(event.reaction()) else {
        return false;
    };
    match (event, *reaction) {
        (ReactionEvent::Single { id, .. }, Reaction::Decay { .. }) => updater.remove(id, true),
        (ReactionEvent::Single { id, .. }, Reaction::Conversion { product, .. }) => {
            updater.direct_update(id, Some(product), None, true)
        },
        (ReactionEvent::Single { id, .. }, Reaction::Fission { product1, product2, product_distance, .. }) => {
            let Some(center) = updater.collection().position(id).copied() else {
                return false;
            };
            if !updater.claim(id) {
                return false;
            }
            let n = unit_vector::<D, _>(rng);
            let distance = product_distance * rng.random::<f64>().powf(1. / D as f64);
            let half = n * (0.5 * distance);
            updater.direct_update(id, Some(product1), Some(center + half), false);
            updater.add(product2, center - half);
            true
        },
        (ReactionEvent::Pair { id1, id2, .. }, Reaction::Fusion { educt1, product, w1, .. }) => {
            let (first, second) = if updater.collection().type_of(id1) == Some(educt1) { (id1, id2) } else { (id2, id1) };
            let (Some(p1), Some(p2)) =
                (updater.collection().position(first).copied(), updater.collection().position(second).copied())
            else {
                return false;
            };
            if !updater.claim(first) {
                return false;
            }
            if !updater.claim(second) {
                updater.release(first);
                return false;
            }
            let difference = updater.sim_box().shortest_difference(&p1, &p2);
            updater.direct_update(first, Some(product), Some(p1 + difference * w1), false);
            updater.remove(second, false);
            true
        },
        (ReactionEvent::Pair { id1, id2, .. }, Reaction::Catalysis { catalyst, product, .. }) => {
            let (catalyst_id, educt_id) =
                if updater.collection().type_of(id1) == Some(catalyst) { (id1, id2) } else { (id2, id1) };
            if updater.is_claimed(catalyst_id) || !updater.collection().exists(catalyst_id) {
                return false;
            }
            updater.direct_update(educt_id, Some(product), None, true)
        },
        _ => false,
    }
}
