//! Order-independent keys for particle type pairs.

use fxhash::FxHashMap;
use std::hash::{Hash, Hasher};

/// Boost-style hash mixing.
#[must_use]
pub const fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value.wrapping_add(0x9e37_79b9).wrapping_add(seed << 6).wrapping_add(seed >> 2)
}

/// Unordered pair of type ids: `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy)]
pub struct PairKey(pub usize, pub usize);

impl PairKey {
    #[must_use]
    pub const fn new(a: usize, b: usize) -> Self {
        Self(a, b)
    }

    /// The pair as `(min, max)`.
    #[must_use]
    pub const fn ordered(self) -> (usize, usize) {
        if self.0 <= self.1 { (self.0, self.1) } else { (self.1, self.0) }
    }

    #[must_use]
    pub const fn contains(self, ty: usize) -> bool {
        self.0 == ty || self.1 == ty
    }
}

impl PartialEq for PairKey {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for PairKey {}

impl Hash for PairKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (lo, hi) = self.ordered();
        state.write_u64(hash_combine(hash_combine(0, lo as u64), hi as u64));
    }
}

impl From<(usize, usize)> for PairKey {
    fn from((a, b): (usize, usize)) -> Self {
        Self(a, b)
    }
}

pub type PairMap<V> = FxHashMap<PairKey, V>;
