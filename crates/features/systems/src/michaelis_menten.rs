//! Enzyme kinetics `E + S <-> ES -> E + P` in a small periodic cube.

use ctiprd_kernel::domain::system::{InitialPopulation, ParticleTypeSpec, ReactionSpec, SystemSpec};

pub const NAME: &str = "michaelis_menten";
pub const BOX_EDGE: f64 = 0.3;
pub const KBT: f64 = 2.43614;
pub const DIFFUSION: f64 = 10.;
pub const REACTION_RADIUS: f64 = 0.03;
/// Microscopic rate of `E + S -> ES`.
pub const BINDING_RATE: f64 = 86.786_384_38;
/// Macroscopic rate the binding reaction is tuned to.
pub const BINDING_RATE_MACRO: f64 = 0.0098;
pub const INITIAL_ENZYMES: usize = 909;
pub const INITIAL_SUBSTRATES: usize = 9091;

#[must_use]
pub fn spec() -> SystemSpec {
    let fission = |product2: &str| ReactionSpec::Fission {
        educt: "ES".into(),
        product1: "E".into(),
        product2: product2.into(),
        product_distance: REACTION_RADIUS,
        rate: 1.,
    };
    SystemSpec {
        name: NAME.into(),
        description: "Michaelis-Menten enzyme kinetics".into(),
        dim: 3,
        box_size: vec![BOX_EDGE; 3],
        periodic: true,
        kbt: KBT,
        types: ["E", "S", "ES", "P"].into_iter().map(|name| ParticleTypeSpec::new(name, DIFFUSION)).collect(),
        reactions: vec![
            fission("S"),
            fission("P"),
            ReactionSpec::Fusion {
                educt1: "E".into(),
                educt2: "S".into(),
                product: "ES".into(),
                reaction_radius: REACTION_RADIUS,
                rate: BINDING_RATE,
                weight1: 0.5,
                weight2: 0.5,
            },
        ],
        external_potentials: Vec::new(),
        pair_potentials: Vec::new(),
        initial: vec![
            InitialPopulation { type_name: "E".into(), count: INITIAL_ENZYMES },
            InitialPopulation { type_name: "S".into(), count: INITIAL_SUBSTRATES },
        ],
    }
}
