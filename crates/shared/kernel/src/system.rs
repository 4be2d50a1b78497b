//! Id-resolved simulation systems compiled from [`SystemSpec`]s.

use crate::error::{KernelError, KernelErrorExt};
use crate::geometry::Cuboid;
use crate::particles::ParticleCollection;
use crate::pbc::SimulationBox;
use crate::potentials::{ExternalPotential, PairPotential};
use crate::reactions::Reaction;
use crate::vec::Vector;
use ctiprd_domain::system::{ExternalPotentialSpec, PairPotentialSpec, ReactionSpec, SystemSpec};
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleType {
    pub name: String,
    pub diffusion_constant: f64,
}

#[derive(Debug, Clone)]
pub struct System<const D: usize> {
    name: String,
    sim_box: SimulationBox<D>,
    kbt: f64,
    types: Vec<ParticleType>,
    reactions: Vec<Reaction>,
    external_potentials: Vec<ExternalPotential<D>>,
    pair_potentials: Vec<PairPotential>,
    initial: Vec<(usize, usize)>,
}

impl<const D: usize> System<D> {
    /// Resolves type names to ids and checks every parameter.
    ///
    /// # Errors
    /// * [`KernelError::InvalidSystem`] for a dimension other than `D`, a non-positive box or
    ///   temperature, duplicate type names, or negative/non-finite rates, radii and cutoffs.
    /// * [`KernelError::UnknownType`] when any entry names an undeclared type.
    pub fn from_spec(spec: &SystemSpec) -> Result<Self, KernelError> {
        let ctx = || format!("system '{}'", spec.name);

        if spec.dim != D {
            return Err(invalid(format!("dimension {} does not match {D}", spec.dim))).context(ctx());
        }
        let size = vector::<D>(&spec.box_size, "box_size").context(ctx())?;
        if size.iter().any(|&l| !(l > 0. && l.is_finite())) {
            return Err(invalid(format!("box size {size} must be positive"))).context(ctx());
        }
        non_negative(spec.kbt, "kbt").context(ctx())?;
        if spec.kbt == 0. {
            return Err(invalid("kbt must be positive")).context(ctx());
        }
        if spec.types.is_empty() {
            return Err(invalid("at least one particle type is required")).context(ctx());
        }

        let mut types: Vec<ParticleType> = Vec::with_capacity(spec.types.len());
        for t in &spec.types {
            if t.name.trim().is_empty() || types.iter().any(|known| known.name == t.name) {
                return Err(invalid(format!("type name '{}' is empty or duplicated", t.name))).context(ctx());
            }
            non_negative(t.diffusion_constant, "diffusion_constant").context(ctx())?;
            types.push(ParticleType { name: t.name.clone(), diffusion_constant: t.diffusion_constant });
        }

        let mut system = Self {
            name: spec.name.clone(),
            sim_box: SimulationBox::new(size.0, spec.periodic),
            kbt: spec.kbt,
            types,
            reactions: Vec::with_capacity(spec.reactions.len()),
            external_potentials: Vec::with_capacity(spec.external_potentials.len()),
            pair_potentials: Vec::with_capacity(spec.pair_potentials.len()),
            initial: Vec::with_capacity(spec.initial.len()),
        };

        for r in &spec.reactions {
            let reaction = system.resolve_reaction(r).context(ctx())?;
            system.reactions.push(reaction);
        }
        for p in &spec.external_potentials {
            let potential = system.resolve_external(p).context(ctx())?;
            system.external_potentials.push(potential);
        }
        for p in &spec.pair_potentials {
            let potential = system.resolve_pair(p).context(ctx())?;
            system.pair_potentials.push(potential);
        }
        for population in &spec.initial {
            let ty = system.type_id(&population.type_name).context(ctx())?;
            system.initial.push((ty, population.count));
        }

        debug!(
            system = %system.name,
            dim = D,
            types = system.types.len(),
            reactions = system.reactions.len(),
            "System compiled"
        );
        Ok(system)
    }

    fn resolve_reaction(&self, spec: &ReactionSpec) -> Result<Reaction, KernelError> {
        non_negative(spec.rate(), "rate")?;
        let reaction = match spec {
            ReactionSpec::Decay { educt, rate } => Reaction::Decay { educt: self.type_id(educt)?, rate: *rate },
            ReactionSpec::Conversion { educt, product, rate } => {
                Reaction::Conversion { educt: self.type_id(educt)?, product: self.type_id(product)?, rate: *rate }
            },
            ReactionSpec::Fission { educt, product1, product2, product_distance, rate } => {
                non_negative(*product_distance, "product_distance")?;
                Reaction::Fission {
                    educt: self.type_id(educt)?,
                    product1: self.type_id(product1)?,
                    product2: self.type_id(product2)?,
                    product_distance: *product_distance,
                    rate: *rate,
                }
            },
            ReactionSpec::Fusion { educt1, educt2, product, reaction_radius, rate, weight1, weight2 } => {
                non_negative(*reaction_radius, "reaction_radius")?;
                non_negative(*weight1, "weight1")?;
                non_negative(*weight2, "weight2")?;
                Reaction::Fusion {
                    educt1: self.type_id(educt1)?,
                    educt2: self.type_id(educt2)?,
                    product: self.type_id(product)?,
                    reaction_radius: *reaction_radius,
                    rate: *rate,
                    w1: *weight1,
                    w2: *weight2,
                }
            },
            ReactionSpec::Catalysis { catalyst, educt, product, reaction_radius, rate } => {
                non_negative(*reaction_radius, "reaction_radius")?;
                Reaction::Catalysis {
                    catalyst: self.type_id(catalyst)?,
                    educt: self.type_id(educt)?,
                    product: self.type_id(product)?,
                    reaction_radius: *reaction_radius,
                    rate: *rate,
                }
            },
        };
        Ok(reaction)
    }

    fn resolve_external(&self, spec: &ExternalPotentialSpec) -> Result<ExternalPotential<D>, KernelError> {
        let potential = match spec {
            ExternalPotentialSpec::BoxInclusion { v0, v1, k, types } => {
                non_negative(*k, "k")?;
                ExternalPotential::BoxInclusion { geometry: cuboid(v0, v1)?, k: *k, types: self.type_ids(types)? }
            },
            ExternalPotentialSpec::BoxExclusion { v0, v1, k, types } => {
                non_negative(*k, "k")?;
                ExternalPotential::BoxExclusion { geometry: cuboid(v0, v1)?, k: *k, types: self.type_ids(types)? }
            },
            ExternalPotentialSpec::DoubleWell { k, types } => {
                non_negative(*k, "k")?;
                if D < 2 {
                    return Err(invalid("double well needs at least two dimensions"));
                }
                ExternalPotential::DoubleWell { k: *k, types: self.type_ids(types)? }
            },
        };
        Ok(potential)
    }

    fn resolve_pair(&self, spec: &PairPotentialSpec) -> Result<PairPotential, KernelError> {
        match spec {
            PairPotentialSpec::HarmonicRepulsion { type1, type2, cutoff, force_constant } => {
                non_negative(*cutoff, "cutoff")?;
                non_negative(*force_constant, "force_constant")?;
                Ok(PairPotential::HarmonicRepulsion {
                    type1: self.type_id(type1)?,
                    type2: self.type_id(type2)?,
                    cutoff: *cutoff,
                    force_constant: *force_constant,
                })
            },
        }
    }

    /// # Errors
    /// [`KernelError::UnknownType`] if no type is called `name`.
    pub fn type_id(&self, name: &str) -> Result<usize, KernelError> {
        self.types.iter().position(|t| t.name == name).ok_or_else(|| KernelError::UnknownType {
            message: name.to_owned().into(),
            context: None,
        })
    }

    fn type_ids(&self, names: &[String]) -> Result<Vec<usize>, KernelError> {
        names.iter().map(|n| self.type_id(n)).collect()
    }

    #[must_use]
    pub fn type_name(&self, id: usize) -> Option<&str> {
        self.types.get(id).map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn n_types(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn types(&self) -> &[ParticleType] {
        &self.types
    }

    #[must_use]
    pub fn diffusion_constant(&self, ty: usize) -> f64 {
        self.types.get(ty).map_or(0., |t| t.diffusion_constant)
    }

    #[must_use]
    pub const fn sim_box(&self) -> &SimulationBox<D> {
        &self.sim_box
    }

    #[must_use]
    pub const fn kbt(&self) -> f64 {
        self.kbt
    }

    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    #[must_use]
    pub fn external_potentials(&self) -> &[ExternalPotential<D>] {
        &self.external_potentials
    }

    #[must_use]
    pub fn pair_potentials(&self) -> &[PairPotential] {
        &self.pair_potentials
    }

    /// Initial population as `(type id, count)`.
    #[must_use]
    pub fn initial(&self) -> &[(usize, usize)] {
        &self.initial
    }

    /// Overrides the initial count of one type.
    ///
    /// # Errors
    /// [`KernelError::UnknownType`] if no type is called `name`.
    pub fn set_initial(&mut self, name: &str, count: usize) -> Result<(), KernelError> {
        let ty = self.type_id(name)?;
        match self.initial.iter_mut().find(|(t, _)| *t == ty) {
            Some(entry) => entry.1 = count,
            None => self.initial.push((ty, count)),
        }
        Ok(())
    }

    /// Places the initial population uniformly in the box.
    pub fn populate<R: Rng + ?Sized>(&self, particles: &mut ParticleCollection<D>, rng: &mut R) {
        for &(ty, count) in &self.initial {
            particles.initialize_uniform(count, ty, &self.sim_box, rng);
        }
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> KernelError {
    KernelError::InvalidSystem { message: message.into(), context: None }
}

fn non_negative(value: f64, what: &'static str) -> Result<(), KernelError> {
    if value >= 0. && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{what} must be finite and non-negative, got {value}")))
    }
}

fn vector<const D: usize>(values: &[f64], what: &str) -> Result<Vector<D>, KernelError> {
    Vector::from_slice(values).ok_or_else(|| invalid(format!("{what} needs {D} components, got {}", values.len())))
}

fn cuboid<const D: usize>(v0: &[f64], v1: &[f64]) -> Result<Cuboid<D>, KernelError> {
    let (v0, v1) = (vector::<D>(v0, "v0")?, vector::<D>(v1, "v1")?);
    if (0..D).any(|d| v0[d] >= v1[d]) {
        return Err(invalid(format!("cuboid {v0}..{v1} is empty")));
    }
    Ok(Cuboid::new(v0, v1))
}
