//! Declarative system descriptions.
//!
//! A [`SystemSpec`] is what a preset or a user file provides: a box, particle types,
//! potentials, reactions and an initial population, all keyed by type *name*.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dim: usize,
    pub box_size: Vec<f64>,
    #[serde(default)]
    pub periodic: bool,
    #[serde(default = "default_kbt")]
    pub kbt: f64,
    pub types: Vec<ParticleTypeSpec>,
    #[serde(default)]
    pub reactions: Vec<ReactionSpec>,
    #[serde(default)]
    pub external_potentials: Vec<ExternalPotentialSpec>,
    #[serde(default)]
    pub pair_potentials: Vec<PairPotentialSpec>,
    #[serde(default)]
    pub initial: Vec<InitialPopulation>,
}

impl SystemSpec {
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Total number of particles placed initially.
    #[must_use]
    pub fn initial_particles(&self) -> usize {
        self.initial.iter().map(|p| p.count).sum()
    }
}

const fn default_kbt() -> f64 {
    1.
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTypeSpec {
    pub name: String,
    pub diffusion_constant: f64,
}

impl ParticleTypeSpec {
    pub fn new(name: impl Into<String>, diffusion_constant: f64) -> Self {
        Self { name: name.into(), diffusion_constant }
    }
}

/// Uniformly placed particles of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPopulation {
    #[serde(rename = "type")]
    pub type_name: String,
    pub count: usize,
}

const fn half() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReactionSpec {
    Decay {
        educt: String,
        rate: f64,
    },
    Conversion {
        educt: String,
        product: String,
        rate: f64,
    },
    Fission {
        educt: String,
        product1: String,
        product2: String,
        product_distance: f64,
        rate: f64,
    },
    Fusion {
        educt1: String,
        educt2: String,
        product: String,
        reaction_radius: f64,
        rate: f64,
        #[serde(default = "half")]
        weight1: f64,
        #[serde(default = "half")]
        weight2: f64,
    },
    Catalysis {
        catalyst: String,
        educt: String,
        product: String,
        reaction_radius: f64,
        rate: f64,
    },
}

impl ReactionSpec {
    #[must_use]
    pub const fn rate(&self) -> f64 {
        match self {
            Self::Decay { rate, .. }
            | Self::Conversion { rate, .. }
            | Self::Fission { rate, .. }
            | Self::Fusion { rate, .. }
            | Self::Catalysis { rate, .. } => *rate,
        }
    }

    /// Number of educts (1 or 2).
    #[must_use]
    pub const fn order(&self) -> usize {
        match self {
            Self::Decay { .. } | Self::Conversion { .. } | Self::Fission { .. } => 1,
            Self::Fusion { .. } | Self::Catalysis { .. } => 2,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Decay { .. } => "decay",
            Self::Conversion { .. } => "conversion",
            Self::Fission { .. } => "fission",
            Self::Fusion { .. } => "fusion",
            Self::Catalysis { .. } => "catalysis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalPotentialSpec {
    BoxInclusion {
        v0: Vec<f64>,
        v1: Vec<f64>,
        k: f64,
        #[serde(default)]
        types: Vec<String>,
    },
    BoxExclusion {
        v0: Vec<f64>,
        v1: Vec<f64>,
        k: f64,
        #[serde(default)]
        types: Vec<String>,
    },
    DoubleWell {
        k: f64,
        #[serde(default)]
        types: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairPotentialSpec {
    HarmonicRepulsion { type1: String, type2: String, cutoff: f64, force_constant: f64 },
}
