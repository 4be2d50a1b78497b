//! # Reactions
//!
//! Doi-model reactions on a [`ParticleCollection`](ctiprd_kernel::particles::ParticleCollection):
//! first-order reactions fire per particle, second-order reactions per pair of particles
//! closer than the reaction radius. Firing uses `u < 1 - exp(-rate * tau)`.
//!
//! [`UncontrolledApproximation`] proposes events in parallel and applies them sequentially
//! in random order.

mod error;
pub mod events;
mod uncontrolled;

pub use crate::error::{ReactionError, ReactionErrorExt};
pub use crate::events::ReactionEvent;
pub use crate::uncontrolled::{DEFAULT_SUBDIVISIONS, ReactionReport, UncontrolledApproximation};
