//! # Integrator
//!
//! Time stepping for particle systems.
//!
//! * [`sde::EulerMaruyama`] solves a single stochastic differential equation.
//! * [`EulerMaruyama`] advances a whole particle system: forces, Brownian displacement and
//!   reactions, in that order, with the particle loops running on a shared [`ThreadPool`](ctiprd_kernel::pool::ThreadPool).
//! * [`Trajectory`] records frames of an integrator and serializes them to JSON.

mod brownian;
mod error;
pub mod sde;
mod trajectory;

pub use crate::brownian::{EulerMaruyama, StepReport};
pub use crate::error::{IntegratorError, IntegratorErrorExt};
pub use crate::trajectory::{Frame, Trajectory};
