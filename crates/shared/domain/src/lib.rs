//! # Domain Models
//!
//! This crate contains pure data types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no numerics, no validation beyond what `serde` enforces.
//! Specs refer to particle types by name; `ctiprd-kernel` compiles them into id-based systems.

pub mod config;
pub mod record;
pub mod system;
