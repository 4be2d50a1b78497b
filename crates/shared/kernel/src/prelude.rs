pub use crate::error::{KernelError, KernelErrorExt};
pub use crate::geometry::Cuboid;
pub use crate::hash::{PairKey, PairMap};
pub use crate::neighbor_list::NeighborList;
pub use crate::particles::{ParticleCollection, ParticleCollectionUpdater, ParticlesView};
pub use crate::pbc::SimulationBox;
pub use crate::potentials::{ExternalPotential, PairPotential};
pub use crate::reactions::Reaction;
pub use crate::system::{ParticleType, System};
pub use crate::vec::Vector;
pub use ctiprd_pool::{PoolConfig, ThreadPool};
