//! Provisioning units.
//!
//! A unit is a named node exposing output values and declaring the units
//! whose provisioning it must follow. Units are opaque: the engine never
//! looks at what resource a unit stands for.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use topoform_common::error::{Result, TopoformError};

use crate::graph::EdgeKind;
use crate::value::Value;

/// A named provisioning unit with its outputs and dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningUnit {
    name: String,
    outputs: BTreeMap<String, Value>,
    dependencies: BTreeSet<String>,
    /// Dependencies declared with no data flow behind them.
    #[serde(skip)]
    explicit: BTreeSet<String>,
}

impl ProvisioningUnit {
    /// Creates a unit with no outputs and no dependencies.
    ///
    /// The orchestrator registers these placeholders before any factory runs.
    #[must_use]
    pub fn declared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outputs: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            explicit: BTreeSet::new(),
        }
    }

    /// Starts building a unit with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> UnitBuilder {
        UnitBuilder::new(name)
    }

    /// Returns the unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all outputs keyed by output name.
    #[must_use]
    pub const fn outputs(&self) -> &BTreeMap<String, Value> {
        &self.outputs
    }

    /// Returns a single output.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name)
    }

    /// Returns the names of the units this unit must be provisioned after.
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Returns how this unit came to depend on `name`, or `None` if it
    /// does not.
    ///
    /// A dependency that is also consumed as data counts as implicit.
    #[must_use]
    pub fn dependency_kind(&self, name: &str) -> Option<EdgeKind> {
        if !self.dependencies.contains(name) {
            return None;
        }
        if self.explicit.contains(name) {
            Some(EdgeKind::Explicit)
        } else {
            Some(EdgeKind::Implicit)
        }
    }

    pub(crate) fn record_dependency(&mut self, name: &str, kind: EdgeKind) -> bool {
        let added = self.dependencies.insert(name.to_owned());
        if added && kind == EdgeKind::Explicit {
            let _ = self.explicit.insert(name.to_owned());
        }
        added
    }

    pub(crate) fn set_dependency_kind(&mut self, name: &str, kind: EdgeKind) {
        match kind {
            EdgeKind::Explicit => {
                let _ = self.explicit.insert(name.to_owned());
            }
            EdgeKind::Implicit => {
                let _ = self.explicit.remove(name);
            }
        }
    }
}

/// Builder for a [`ProvisioningUnit`].
#[derive(Debug)]
pub struct UnitBuilder {
    name: String,
    outputs: BTreeMap<String, Value>,
    dependencies: BTreeSet<String>,
    explicit: BTreeSet<String>,
}

impl UnitBuilder {
    /// Creates a builder for a unit named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outputs: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            explicit: BTreeSet::new(),
        }
    }

    /// Declares an output. A later output with the same name replaces it.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>, value: Value) -> Self {
        let _ = self.outputs.insert(name.into(), value);
        self
    }

    /// Records that this unit consumes `value`.
    ///
    /// A deferred value owned by another unit adds an implicit dependency on
    /// that unit, so its expression is never evaluated before the owning
    /// resource exists. Consuming a unit already named by
    /// [`UnitBuilder::depends_on`] turns that dependency implicit.
    #[must_use]
    pub fn consumes(mut self, value: &Value) -> Self {
        if let Some(source) = value.source_unit() {
            if source != self.name {
                let _ = self.dependencies.insert(source.to_owned());
                let _ = self.explicit.remove(source);
            }
        }
        self
    }

    /// Records that this unit consumes every value in `values`.
    #[must_use]
    pub fn consumes_all<'a>(self, values: impl IntoIterator<Item = &'a Value>) -> Self {
        values.into_iter().fold(self, Self::consumes)
    }

    /// Declares an explicit ordering dependency on `unit`.
    ///
    /// Has no effect on a unit whose values are already consumed.
    #[must_use]
    pub fn depends_on(mut self, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        if self.dependencies.insert(unit.clone()) {
            let _ = self.explicit.insert(unit);
        }
        self
    }

    /// Finishes the unit.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::CyclicDependency`] if the unit depends on
    /// itself.
    pub fn build(self) -> Result<ProvisioningUnit> {
        if self.dependencies.contains(&self.name) {
            return Err(TopoformError::CyclicDependency {
                members: vec![self.name],
            });
        }
        Ok(ProvisioningUnit {
            name: self.name,
            outputs: self.outputs,
            dependencies: self.dependencies,
            explicit: self.explicit,
        })
    }
}
