//! # System Presets
//!
//! The predefined reaction-diffusion systems. Each preset is a plain [`SystemSpec`] that can
//! be serialized, edited and compiled into a [`System`] of the matching dimension.

pub mod double_well;
mod error;
pub mod lotka_volterra;
pub mod lotka_volterra_2d;
pub mod michaelis_menten;

pub use crate::error::{SystemsError, SystemsErrorExt};
use ctiprd_kernel::domain::system::SystemSpec;
use ctiprd_kernel::rates::macroscopic_rate;
use ctiprd_kernel::system::System;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Preset {
    DoubleWell,
    MichaelisMenten,
    LotkaVolterra,
    #[strum(serialize = "lotka_volterra_2d")]
    LotkaVolterra2d,
}

impl Preset {
    /// All presets in registry order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// # Errors
    /// [`SystemsError::UnknownPreset`] if `name` is not a preset.
    pub fn from_name(name: &str) -> Result<Self, SystemsError> {
        Self::from_str(name).map_err(|_| SystemsError::UnknownPreset {
            message: name.to_owned().into(),
            context: Some(format!("known presets: {}", Self::names().join(", ")).into()),
        })
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(<&'static str>::from).collect()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub fn spec(self) -> SystemSpec {
        match self {
            Self::DoubleWell => double_well::spec(),
            Self::MichaelisMenten => michaelis_menten::spec(),
            Self::LotkaVolterra => lotka_volterra::spec(),
            Self::LotkaVolterra2d => lotka_volterra_2d::spec(),
        }
    }

    #[must_use]
    pub const fn dim(self) -> usize {
        match self {
            Self::MichaelisMenten => 3,
            Self::DoubleWell | Self::LotkaVolterra | Self::LotkaVolterra2d => 2,
        }
    }

    /// Checks the preset's tuned rates, if it has any.
    ///
    /// # Errors
    /// [`SystemsError::RateMismatch`] if a tuned rate is off.
    pub fn validate(self) -> Result<(), SystemsError> {
        match self {
            Self::LotkaVolterra2d => lotka_volterra_2d::validate(&lotka_volterra_2d::RATES),
            Self::MichaelisMenten => {
                let k_macro = macroscopic_rate(
                    michaelis_menten::BINDING_RATE,
                    michaelis_menten::DIFFUSION,
                    michaelis_menten::DIFFUSION,
                    michaelis_menten::REACTION_RADIUS,
                );
                if (k_macro - michaelis_menten::BINDING_RATE_MACRO).abs() > lotka_volterra_2d::RATE_TOLERANCE {
                    return Err(SystemsError::RateMismatch {
                        message: format!("kmac = {k_macro}, binding = {}", michaelis_menten::BINDING_RATE_MACRO).into(),
                        context: Some(michaelis_menten::NAME.into()),
                    });
                }
                Ok(())
            },
            Self::DoubleWell | Self::LotkaVolterra => Ok(()),
        }
    }

    /// Validates and compiles the preset.
    ///
    /// # Errors
    /// [`SystemsError::Kernel`] if `D` is not the preset's dimension, or
    /// [`SystemsError::RateMismatch`] from [`Preset::validate`].
    pub fn system<const D: usize>(self) -> Result<System<D>, SystemsError> {
        self.validate()?;
        System::from_spec(&self.spec()).context(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        assert_eq!(Preset::names(), vec!["double_well", "michaelis_menten", "lotka_volterra", "lotka_volterra_2d"]);
        for preset in Preset::all() {
            assert_eq!(Preset::from_name(preset.name()).unwrap(), preset);
            assert_eq!(preset.to_string(), preset.name());
            assert_eq!(preset.spec().name, preset.name());
            assert_eq!(preset.spec().dim, preset.dim());
        }
    }

    #[test]
    fn test_unknown_preset() {
        let err = Preset::from_name("brusselator").unwrap_err();
        assert!(matches!(err, SystemsError::UnknownPreset { .. }));
        assert!(err.to_string().contains("lotka_volterra_2d"));
    }
}
