//! Two particle types in a 2D double well, kept apart by harmonic repulsion.

use ctiprd_kernel::domain::system::{
    ExternalPotentialSpec, InitialPopulation, PairPotentialSpec, ParticleTypeSpec, SystemSpec,
};

pub const NAME: &str = "double_well";
pub const BOX_SIZE: [f64; 2] = [5., 5.];
pub const WELL_DEPTH: f64 = 1.;
pub const REPULSION_CUTOFF: f64 = 1.;
pub const REPULSION_STRENGTH: f64 = 1.;

#[must_use]
pub fn spec() -> SystemSpec {
    let repulsion = |a: &str, b: &str| PairPotentialSpec::HarmonicRepulsion {
        type1: a.into(),
        type2: b.into(),
        cutoff: REPULSION_CUTOFF,
        force_constant: REPULSION_STRENGTH,
    };
    SystemSpec {
        name: NAME.into(),
        description: "A and B particles in the potential k(x^2-1)^2 + ky^2".into(),
        dim: 2,
        box_size: BOX_SIZE.to_vec(),
        periodic: false,
        kbt: 1.,
        types: vec![ParticleTypeSpec::new("A", 1.), ParticleTypeSpec::new("B", 1.)],
        reactions: Vec::new(),
        external_potentials: vec![ExternalPotentialSpec::DoubleWell {
            k: WELL_DEPTH,
            types: vec!["A".into(), "B".into()],
        }],
        pair_potentials: vec![repulsion("A", "A"), repulsion("A", "B"), repulsion("B", "B")],
        initial: vec![InitialPopulation { type_name: "A".into(), count: 1000 }],
    }
}
