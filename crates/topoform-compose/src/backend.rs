//! The provisioning backend interface.
//!
//! Creating the underlying resources is the backend's job. The engine only
//! hands it constructed units, dependencies first.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use topoform_common::error::{Result, TopoformError};

use crate::unit::ProvisioningUnit;
use crate::value::Value;

/// A backend that creates the resources a unit stands for.
///
/// Implementors may assume every dependency of `unit` was handed to them
/// before `unit`.
pub trait ProvisioningBackend {
    /// Provisions one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot accept the unit.
    fn provision(&mut self, unit: &ProvisioningUnit) -> Result<()>;
}

/// One step of a recorded plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    /// One-based position in the creation order.
    pub step: usize,
    /// Unit name.
    pub unit: String,
    /// Units this unit follows.
    pub dependencies: Vec<String>,
    /// Declared outputs.
    pub outputs: BTreeMap<String, Value>,
}

/// Backend that records what would be provisioned instead of calling a
/// remote API.
#[derive(Debug, Default)]
pub struct PlanRecorder {
    entries: Vec<PlanEntry>,
    seen: BTreeSet<String>,
}

impl PlanRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded steps.
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Consumes the recorder, returning its steps.
    #[must_use]
    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }

    /// Serializes the recorded plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl ProvisioningBackend for PlanRecorder {
    fn provision(&mut self, unit: &ProvisioningUnit) -> Result<()> {
        if let Some(missing) = unit
            .dependencies()
            .iter()
            .find(|dependency| !self.seen.contains(*dependency))
        {
            return Err(TopoformError::Config {
                message: format!(
                    "unit \"{}\" handed to backend before its dependency \"{missing}\"",
                    unit.name()
                ),
            });
        }

        tracing::debug!(unit = %unit.name(), step = self.entries.len() + 1, "recording unit");
        let _ = self.seen.insert(unit.name().to_owned());
        self.entries.push(PlanEntry {
            step: self.entries.len() + 1,
            unit: unit.name().to_owned(),
            dependencies: unit.dependencies().iter().cloned().collect(),
            outputs: unit.outputs().clone(),
        });
        Ok(())
    }
}
