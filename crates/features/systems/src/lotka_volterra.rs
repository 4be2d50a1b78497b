//! Predator-prey dynamics in a closed 10 x 50 box.

use ctiprd_kernel::domain::system::{
    ExternalPotentialSpec, InitialPopulation, ParticleTypeSpec, ReactionSpec, SystemSpec,
};

pub const NAME: &str = "lotka_volterra";

#[must_use]
pub fn spec() -> SystemSpec {
    let friction = |ty: &str| ReactionSpec::Fusion {
        educt1: ty.into(),
        educt2: ty.into(),
        product: ty.into(),
        reaction_radius: 0.1,
        rate: 1e-5,
        weight1: 0.5,
        weight2: 0.5,
    };
    SystemSpec {
        name: NAME.into(),
        description: "Lotka-Volterra predator-prey system".into(),
        dim: 2,
        box_size: vec![10., 50.],
        periodic: false,
        kbt: 1.,
        types: vec![ParticleTypeSpec::new("predator", 1.), ParticleTypeSpec::new("prey", 1.)],
        reactions: vec![
            ReactionSpec::Fission {
                educt: "prey".into(),
                product1: "prey".into(),
                product2: "prey".into(),
                product_distance: 0.1,
                rate: 0.004,
            },
            ReactionSpec::Decay { educt: "predator".into(), rate: 0.003 },
            friction("prey"),
            friction("predator"),
            ReactionSpec::Catalysis {
                catalyst: "predator".into(),
                educt: "prey".into(),
                product: "predator".into(),
                reaction_radius: 0.1,
                rate: 0.000_477,
            },
        ],
        external_potentials: vec![ExternalPotentialSpec::BoxInclusion {
            v0: vec![-4., -24.],
            v1: vec![4., 24.],
            k: 50.,
            types: Vec::new(),
        }],
        pair_potentials: Vec::new(),
        initial: vec![
            InitialPopulation { type_name: "prey".into(), count: 125 },
            InitialPopulation { type_name: "predator".into(), count: 100 },
        ],
    }
}
