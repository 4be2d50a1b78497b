//! Recorded simulation frames and their JSON form.
//!
//! A frame stores one entry per particle slot. Blank slots have infinite positions and the
//! type id `n_types`; in JSON the infinite components are written as `null`.

use crate::brownian::EulerMaruyama;
use crate::error::{IntegratorError, IntegratorErrorExt};
use ctiprd_kernel::domain::record::RecordFields;
use ctiprd_kernel::pool::{ThreadPool, partition};
use ctiprd_kernel::system::System;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    pub time: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "blank_positions::deserialize")]
    pub positions: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub system: String,
    pub dim: usize,
    /// Type names by id.
    pub types: Vec<String>,
    pub fields: RecordFields,
    pub frames: Vec<Frame>,
}

impl Trajectory {
    #[must_use]
    pub fn new<const D: usize>(system: &System<D>, fields: RecordFields) -> Self {
        Self {
            system: system.name().to_owned(),
            dim: D,
            types: system.types().iter().map(|t| t.name.clone()).collect(),
            fields,
            frames: Vec::new(),
        }
    }

    /// Type id marking a blank slot.
    #[must_use]
    pub const fn blank_type(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Appends the integrator's current state as a frame.
    ///
    /// # Errors
    /// [`IntegratorError::Pool`] if the parallel position copy fails.
    pub fn record<const D: usize>(
        &mut self,
        integrator: &EulerMaruyama<D>,
        pool: &ThreadPool,
    ) -> Result<(), IntegratorError> {
        let particles = integrator.particles();
        let blank = self.blank_type();

        let positions = if self.fields.contains(RecordFields::POSITIONS) {
            let slots = particles.positions();
            let chunks = pool
                .map_scoped(partition(slots.len(), pool.granularity()), |range| {
                    slots[range]
                        .iter()
                        .map(|slot| slot.as_ref().map_or_else(|| vec![f64::INFINITY; D], |p| p.0.to_vec()))
                        .collect::<Vec<_>>()
                })
                .context("record positions")?;
            chunks.into_iter().flatten().collect()
        } else {
            Vec::new()
        };

        let types = if self.fields.contains(RecordFields::TYPES) {
            (0..particles.len()).map(|ix| particles.type_of(ix).unwrap_or(blank)).collect()
        } else {
            Vec::new()
        };

        let counts =
            if self.fields.contains(RecordFields::COUNTS) { particles.count_by_type(blank) } else { Vec::new() };

        self.frames.push(Frame { step: integrator.steps(), time: integrator.time(), positions, types, counts });
        Ok(())
    }

    /// Population per type for every frame, from the recorded counts or, failing that, the
    /// recorded types.
    #[must_use]
    pub fn counts(&self) -> Vec<Vec<usize>> {
        let n_types = self.blank_type();
        self.frames
            .iter()
            .map(|frame| {
                if !frame.counts.is_empty() {
                    return frame.counts.clone();
                }
                let mut counts = vec![0; n_types];
                for &ty in &frame.types {
                    if let Some(c) = counts.get_mut(ty) {
                        *c += 1;
                    }
                }
                counts
            })
            .collect()
    }

    /// # Errors
    /// [`IntegratorError::Serialize`] if encoding fails.
    pub fn to_json(&self) -> Result<String, IntegratorError> {
        serde_json::to_string(self).map_err(IntegratorError::from)
    }

    /// # Errors
    /// [`IntegratorError::Serialize`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, IntegratorError> {
        serde_json::from_str(json).map_err(IntegratorError::from)
    }

    /// Writes the trajectory as JSON, creating parent directories as needed.
    ///
    /// # Errors
    /// [`IntegratorError::Io`] / [`IntegratorError::Serialize`] if writing fails.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), IntegratorError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("create trajectory directory")?;
        }
        let mut writer = BufWriter::new(File::create(path).context("create trajectory file")?);
        serde_json::to_writer(&mut writer, self).context("write trajectory")?;
        writer.flush().context("flush trajectory")?;
        debug!(path = %path.display(), frames = self.frames.len(), "Trajectory written");
        Ok(())
    }

    /// # Errors
    /// [`IntegratorError::Io`] / [`IntegratorError::Serialize`] if reading fails.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, IntegratorError> {
        let reader = BufReader::new(File::open(path.as_ref()).context("open trajectory file")?);
        serde_json::from_reader(reader).context("read trajectory")
    }
}

mod blank_positions {
    use serde::{Deserialize, Deserializer};

    /// `null` components come from infinite (blank) positions.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<f64>>, D::Error> {
        let raw = Vec::<Vec<Option<f64>>>::deserialize(d)?;
        Ok(raw.into_iter().map(|p| p.into_iter().map(|x| x.unwrap_or(f64::INFINITY)).collect()).collect())
    }
}
