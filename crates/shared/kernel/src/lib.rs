//! Simulation kernel shared by the feature crates.
//! Keep this crate free of feature policy; it provides the numerical building blocks
//! (vectors, boxes, particle storage, neighbor lists, potential and reaction definitions)
//! plus layered config loading.
//!
//! ## Building a system
//! ```rust
//! use ctiprd_kernel::prelude::*;
//! use ctiprd_kernel::domain::system::{ParticleTypeSpec, SystemSpec};
//!
//! let spec = SystemSpec {
//!     name: "free".into(),
//!     description: String::new(),
//!     dim: 2,
//!     box_size: vec![5., 5.],
//!     periodic: true,
//!     kbt: 1.,
//!     types: vec![ParticleTypeSpec::new("A", 1.)],
//!     reactions: vec![],
//!     external_potentials: vec![],
//!     pair_potentials: vec![],
//!     initial: vec![],
//! };
//! let system = System::<2>::from_spec(&spec).unwrap();
//! let mut particles = ParticleCollection::new();
//! particles.add_particle_named(Vector::new([0., 1.]), "A", &system).unwrap();
//! assert_eq!(particles.n_particles(), 1);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use ctiprd_kernel::config::load_config;
//! let cfg: ctiprd_kernel::domain::config::AppConfig = load_config(Some("config/simulation.toml")).unwrap();
//! ```
pub mod config;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod index;
pub mod neighbor_list;
pub mod ops;
pub mod particles;
pub mod pbc;
pub mod potentials;
pub mod prefix_sum;
pub mod prelude;
pub mod random;
pub mod rates;
pub mod reactions;
pub mod system;
pub mod vec;

pub use ctiprd_domain as domain;
pub use ctiprd_pool as pool;
