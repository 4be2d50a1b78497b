use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const POSITIONS: &str = "positions";
pub const TYPES: &str = "types";
pub const COUNTS: &str = "counts";

bitflags! {
    /// Which per-frame data a trajectory keeps.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RecordFields: u8 {
        const POSITIONS = 1 << 0;
        const TYPES = 1 << 1;
        const COUNTS = 1 << 2;

        const ALL = Self::POSITIONS.bits() | Self::TYPES.bits() | Self::COUNTS.bits();
    }
}

impl Default for RecordFields {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<&str> for RecordFields {
    fn from(s: &str) -> Self {
        match s.trim() {
            POSITIONS => Self::POSITIONS,
            TYPES => Self::TYPES,
            COUNTS => Self::COUNTS,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl RecordFields {
    /// Field names in a stable order, as written to config files.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        [(Self::POSITIONS, POSITIONS), (Self::TYPES, TYPES), (Self::COUNTS, COUNTS)]
            .into_iter()
            .filter_map(|(flag, name)| self.contains(flag).then_some(name))
            .collect()
    }
}

impl Serialize for RecordFields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(names.iter().fold(Self::empty(), |acc, name| acc | Self::from(name.as_str())))
    }
}
