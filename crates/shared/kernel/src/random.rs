//! Random sampling helpers shared by the integrator and the reaction handler.

use crate::hash::hash_combine;
use crate::vec::Vector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Standard normal sample via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Vector of independent standard normal components.
pub fn normal_vector<const D: usize, R: Rng + ?Sized>(rng: &mut R) -> Vector<D> {
    let mut v = Vector::zero();
    for x in &mut v.0 {
        *x = standard_normal(rng);
    }
    v
}

/// Uniformly distributed direction on the unit sphere.
pub fn unit_vector<const D: usize, R: Rng + ?Sized>(rng: &mut R) -> Vector<D> {
    loop {
        let v = normal_vector::<D, R>(rng);
        let norm = v.norm();
        if norm > 1e-12 {
            return v / norm;
        }
    }
}

/// Independent generator for one chunk of one step, derived from the run seed.
#[must_use]
pub fn stream(seed: u64, step: u64, chunk: usize) -> StdRng {
    StdRng::seed_from_u64(hash_combine(hash_combine(seed, step), chunk as u64))
}
