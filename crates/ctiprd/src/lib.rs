//! Facade crate for `CTiPRD` features and shared modules.
//! Re-exports domain/kernel primitives and the feature slices enabled at build time.
//! Keep this crate thin: it should compose other crates, not implement simulation logic.
//!
//! ## Usage
//! - Add `ctiprd` with the desired feature flags (`simulation`/`manifest`).
//! - Reach every slice through [`features`], e.g. `ctiprd::features::integrator::EulerMaruyama`.

pub use ctiprd_domain as domain;
pub use ctiprd_kernel as kernel;
pub use ctiprd_kernel::pool;

/// Feature registry for runtime introspection.
pub mod features {
    #[cfg(feature = "simulation")]
    pub use ctiprd_forces as forces;
    #[cfg(feature = "simulation")]
    pub use ctiprd_integrator as integrator;
    #[cfg(feature = "manifest")]
    pub use ctiprd_manifest as manifest;
    #[cfg(feature = "simulation")]
    pub use ctiprd_reactions as reactions;
    #[cfg(feature = "simulation")]
    pub use ctiprd_systems as systems;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "simulation")]
        "forces",
        #[cfg(feature = "simulation")]
        "reactions",
        #[cfg(feature = "simulation")]
        "integrator",
        #[cfg(feature = "simulation")]
        "systems",
        #[cfg(feature = "manifest")]
        "manifest",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
