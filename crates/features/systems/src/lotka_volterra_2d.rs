//! Predator-prey dynamics in a periodic 10 x 50 box, confined by a box potential and walls
//! of immobile barrier particles.
//!
//! Second-order reactions are given as microscopic rates tuned to the macroscopic rates in
//! [`Rates`]; [`validate`] checks the tuning.

use crate::error::SystemsError;
use ctiprd_kernel::domain::system::{
    ExternalPotentialSpec, InitialPopulation, PairPotentialSpec, ParticleTypeSpec, ReactionSpec, SystemSpec,
};
use ctiprd_kernel::rates::macroscopic_rate;
use tracing::debug;

pub const NAME: &str = "lotka_volterra_2d";
pub const KBT: f64 = 2.43614;
/// Allowed deviation of a tuned macroscopic rate.
pub const RATE_TOLERANCE: f64 = 1e-5;

/// Model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub diffusion_prey: f64,
    pub diffusion_predator: f64,
    /// Birth `prey -> prey + prey`.
    pub alpha: f64,
    pub alpha_distance: f64,
    /// Macroscopic rate of `predator + prey -> predator + predator`.
    pub beta: f64,
    pub beta_radius: f64,
    pub beta_micro: f64,
    /// Death `predator -> 0`.
    pub gamma: f64,
    /// Macroscopic rate of the same-species fusions.
    pub friction: f64,
    pub friction_radius: f64,
    pub friction_micro: f64,
}

pub const RATES: Rates = Rates {
    diffusion_prey: 0.01,
    diffusion_predator: 0.01,
    alpha: 2.,
    alpha_distance: 0.2,
    beta: 0.05,
    beta_radius: 0.25,
    beta_micro: 7.670_679_846_561_291,
    gamma: 1.5,
    friction: 0.01,
    friction_radius: 0.2,
    friction_micro: 0.391_555_650_247_861_65,
};

#[must_use]
pub fn spec() -> SystemSpec {
    let r = RATES;
    let friction = |ty: &str| ReactionSpec::Fusion {
        educt1: ty.into(),
        educt2: ty.into(),
        product: ty.into(),
        reaction_radius: r.friction_radius,
        rate: r.friction_micro,
        weight1: 0.5,
        weight2: 0.5,
    };
    let wall = |ty: &str| PairPotentialSpec::HarmonicRepulsion {
        type1: "barrier".into(),
        type2: ty.into(),
        cutoff: 0.3,
        force_constant: 50.,
    };
    SystemSpec {
        name: NAME.into(),
        description: "Lotka-Volterra with diffusion-influenced reactions and barrier walls".into(),
        dim: 2,
        box_size: vec![10., 50.],
        periodic: true,
        kbt: KBT,
        types: vec![
            ParticleTypeSpec::new("predator", r.diffusion_predator),
            ParticleTypeSpec::new("prey", r.diffusion_prey),
            ParticleTypeSpec::new("barrier", 0.),
        ],
        reactions: vec![
            ReactionSpec::Fission {
                educt: "prey".into(),
                product1: "prey".into(),
                product2: "prey".into(),
                product_distance: r.alpha_distance,
                rate: r.alpha,
            },
            ReactionSpec::Decay { educt: "predator".into(), rate: r.gamma },
            friction("prey"),
            friction("predator"),
            ReactionSpec::Catalysis {
                catalyst: "predator".into(),
                educt: "prey".into(),
                product: "predator".into(),
                reaction_radius: r.beta_radius,
                rate: r.beta_micro,
            },
        ],
        external_potentials: vec![ExternalPotentialSpec::BoxInclusion {
            v0: vec![-4., -24.],
            v1: vec![4., 24.],
            k: 150.,
            types: Vec::new(),
        }],
        pair_potentials: vec![wall("prey"), wall("predator")],
        initial: vec![
            InitialPopulation { type_name: "prey".into(), count: 125 },
            InitialPopulation { type_name: "predator".into(), count: 100 },
        ],
    }
}

/// Checks that the microscopic rates reproduce `beta` and `friction` within [`RATE_TOLERANCE`].
///
/// # Errors
/// [`SystemsError::RateMismatch`] naming the first rate that is off.
pub fn validate(rates: &Rates) -> Result<(), SystemsError> {
    check_rate("beta", rates.beta_micro, rates.beta_radius, rates.beta, rates)?;
    check_rate("friction", rates.friction_micro, rates.friction_radius, rates.friction, rates)?;
    debug!(beta = rates.beta, friction = rates.friction, "Lotka-Volterra rates validated");
    Ok(())
}

fn check_rate(name: &'static str, micro: f64, radius: f64, expected: f64, rates: &Rates) -> Result<(), SystemsError> {
    let k_macro = macroscopic_rate(micro, rates.diffusion_prey, rates.diffusion_predator, radius);
    if (k_macro - expected).abs() > RATE_TOLERANCE {
        return Err(SystemsError::RateMismatch {
            message: format!("kmac = {k_macro}, {name} = {expected}").into(),
            context: Some(NAME.into()),
        });
    }
    Ok(())
}
