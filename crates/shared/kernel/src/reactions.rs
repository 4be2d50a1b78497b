//! Doi-model reaction definitions, resolved to type ids.

/// A reaction between particle types, identified by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// `A -> 0`
    Decay { educt: usize, rate: f64 },
    /// `A -> B`
    Conversion { educt: usize, product: usize, rate: f64 },
    /// `A -> B + C`, products placed `product_distance` apart at most.
    Fission { educt: usize, product1: usize, product2: usize, product_distance: f64, rate: f64 },
    /// `A + B -> C`, product placed on the segment between educts with weights `w1`/`w2`.
    Fusion { educt1: usize, educt2: usize, product: usize, reaction_radius: f64, rate: f64, w1: f64, w2: f64 },
    /// `C + A -> C + B`
    Catalysis { catalyst: usize, educt: usize, product: usize, reaction_radius: f64, rate: f64 },
}

impl Reaction {
    #[must_use]
    pub const fn rate(&self) -> f64 {
        match *self {
            Self::Decay { rate, .. }
            | Self::Conversion { rate, .. }
            | Self::Fission { rate, .. }
            | Self::Fusion { rate, .. }
            | Self::Catalysis { rate, .. } => rate,
        }
    }

    #[must_use]
    pub const fn order(&self) -> usize {
        match self {
            Self::Decay { .. } | Self::Conversion { .. } | Self::Fission { .. } => 1,
            Self::Fusion { .. } | Self::Catalysis { .. } => 2,
        }
    }

    /// Reaction radius of second-order reactions.
    #[must_use]
    pub const fn radius(&self) -> Option<f64> {
        match *self {
            Self::Fusion { reaction_radius, .. } | Self::Catalysis { reaction_radius, .. } => Some(reaction_radius),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Decay { .. } => "decay",
            Self::Conversion { .. } => "conversion",
            Self::Fission { .. } => "fission",
            Self::Fusion { .. } => "fusion",
            Self::Catalysis { .. } => "catalysis",
        }
    }

    /// Whether a first-order reaction acts on a particle of type `ty`.
    #[must_use]
    pub const fn matches_one(&self, ty: usize) -> bool {
        match *self {
            Self::Decay { educt, .. } | Self::Conversion { educt, .. } | Self::Fission { educt, .. } => educt == ty,
            _ => false,
        }
    }

    /// Whether a second-order reaction acts on the types `(t1, t2)` in either order.
    #[must_use]
    pub const fn matches_pair(&self, t1: usize, t2: usize) -> bool {
        let (a, b) = match *self {
            Self::Fusion { educt1, educt2, .. } => (educt1, educt2),
            Self::Catalysis { catalyst, educt, .. } => (catalyst, educt),
            _ => return false,
        };
        (a == t1 && b == t2) || (a == t2 && b == t1)
    }

    /// Types that can take part in the reaction as educts or catalyst.
    #[must_use]
    pub fn educts(&self) -> Vec<usize> {
        match *self {
            Self::Decay { educt, .. } | Self::Conversion { educt, .. } | Self::Fission { educt, .. } => vec![educt],
            Self::Fusion { educt1, educt2, .. } => vec![educt1, educt2],
            Self::Catalysis { catalyst, educt, .. } => vec![catalyst, educt],
        }
    }
}

/// Firing probability of a reaction with `rate` over a step `tau`.
#[must_use]
pub fn firing_probability(rate: f64, tau: f64) -> f64 {
    1. - (-rate * tau).exp()
}

/// `u < 1 - exp(-rate * tau)` for a uniform draw `u`.
#[must_use]
pub fn fires(rate: f64, tau: f64, u: f64) -> bool {
    u < firing_probability(rate, tau)
}

/// Largest reaction radius among second-order reactions, `0` if there are none.
#[must_use]
pub fn reaction_radius(reactions: &[Reaction]) -> f64 {
    reactions.iter().filter_map(Reaction::radius).fold(0., f64::max)
}
