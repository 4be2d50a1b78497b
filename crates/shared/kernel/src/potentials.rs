//! External and pair potential definitions, resolved to type ids.

use crate::geometry::Cuboid;
use crate::hash::PairKey;
use crate::pbc::SimulationBox;
use crate::vec::Vector;

/// Single-particle potential. An empty `types` list applies it to every type.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalPotential<const D: usize> {
    /// Harmonic confinement to the inside of `geometry`.
    BoxInclusion { geometry: Cuboid<D>, k: f64, types: Vec<usize> },
    /// Harmonic expulsion from the inside of `geometry`.
    BoxExclusion { geometry: Cuboid<D>, k: f64, types: Vec<usize> },
    /// `k (x^2 - 1)^2 + k y^2` over the first two components.
    DoubleWell { k: f64, types: Vec<usize> },
}

impl<const D: usize> ExternalPotential<D> {
    #[must_use]
    pub fn types(&self) -> &[usize] {
        match self {
            Self::BoxInclusion { types, .. } | Self::BoxExclusion { types, .. } | Self::DoubleWell { types, .. } => types,
        }
    }

    #[must_use]
    pub fn applies_to(&self, ty: usize) -> bool {
        let types = self.types();
        types.is_empty() || types.contains(&ty)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BoxInclusion { .. } => "box_inclusion",
            Self::BoxExclusion { .. } => "box_exclusion",
            Self::DoubleWell { .. } => "double_well",
        }
    }

    #[must_use]
    pub fn energy(&self, pos: &Vector<D>) -> f64 {
        match self {
            Self::BoxInclusion { geometry, k, .. } => 0.5 * k * geometry.smallest_difference(pos, true).norm_squared(),
            Self::BoxExclusion { geometry, k, .. } => 0.5 * k * geometry.smallest_difference(pos, false).norm_squared(),
            Self::DoubleWell { k, .. } => {
                let x = pos[0];
                let y = if D > 1 { pos[1] } else { 0. };
                k * (x * x - 1.).powi(2) + k * y * y
            },
        }
    }

    #[must_use]
    pub fn force(&self, pos: &Vector<D>) -> Vector<D> {
        match self {
            Self::BoxInclusion { geometry, k, .. } => -*k * geometry.smallest_difference(pos, true),
            Self::BoxExclusion { geometry, k, .. } => -*k * geometry.smallest_difference(pos, false),
            Self::DoubleWell { k, .. } => {
                let mut force = Vector::zero();
                let x = pos[0];
                force[0] = -4. * k * x * x * x + 4. * k * x;
                if D > 1 {
                    force[1] = -2. * k * pos[1];
                }
                force
            },
        }
    }
}

/// Two-particle potential between an unordered pair of types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairPotential {
    /// `k/2 (d - cutoff)^2` for `d < cutoff`.
    HarmonicRepulsion { type1: usize, type2: usize, cutoff: f64, force_constant: f64 },
}

impl PairPotential {
    #[must_use]
    pub const fn key(&self) -> PairKey {
        match *self {
            Self::HarmonicRepulsion { type1, type2, .. } => PairKey::new(type1, type2),
        }
    }

    #[must_use]
    pub const fn cutoff(&self) -> f64 {
        match *self {
            Self::HarmonicRepulsion { cutoff, .. } => cutoff,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HarmonicRepulsion { .. } => "harmonic_repulsion",
        }
    }

    #[must_use]
    pub fn energy<const D: usize>(&self, x1: &Vector<D>, x2: &Vector<D>, sim_box: &SimulationBox<D>) -> f64 {
        match *self {
            Self::HarmonicRepulsion { cutoff, force_constant, .. } => {
                let d2 = sim_box.distance_squared(x1, x2);
                if d2 < cutoff * cutoff {
                    let d = d2.sqrt() - cutoff;
                    0.5 * force_constant * d * d
                } else {
                    0.
                }
            },
        }
    }

    /// Force acting on the particle at `x1`.
    #[must_use]
    pub fn force<const D: usize>(&self, x1: &Vector<D>, x2: &Vector<D>, sim_box: &SimulationBox<D>) -> Vector<D> {
        match *self {
            Self::HarmonicRepulsion { cutoff, force_constant, .. } => {
                let xij = sim_box.shortest_difference(x1, x2);
                let d2 = xij.norm_squared();
                if d2 > 0. && d2 < cutoff * cutoff {
                    let d = d2.sqrt();
                    xij * (force_constant * (d - cutoff) / d)
                } else {
                    Vector::zero()
                }
            },
        }
    }
}
