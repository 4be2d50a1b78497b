//! # Package Manifest
//!
//! The project's package manifest: its parsed model, the shipped revisions, the differences
//! between them and the ordered plan a package manager would follow to honour one.
//!
//! ## Example
//!
//! ```
//! use ctiprd_manifest::{Manifest, Revision, resolve};
//!
//! let current = Manifest::revision(Revision::Current).unwrap();
//! let plan = resolve(&current);
//! assert_eq!(plan.header_only_packages(), vec!["spdlog", "fmt"]);
//! ```

mod diff;
mod error;
mod model;
mod plan;
mod revision;

pub use crate::diff::{ManifestDiff, Repin};
pub use crate::error::{ManifestError, ManifestErrorExt};
pub use crate::model::{ConfigureOverride, Generator, Manifest, Requirement};
pub use crate::plan::{ConfigureStep, Dependency, HEADER_ONLY, ResolutionPlan, resolve};
pub use crate::revision::Revision;
