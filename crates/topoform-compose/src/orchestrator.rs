//! Dependency-ordered construction of provisioning units.
//!
//! Every unit is described by a factory that names the units whose outputs
//! it reads (`needs`) and the units it must merely follow (`after`). The
//! orchestrator registers all names, fixes the creation order, then invokes
//! each factory with the outputs of the units it needs.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use topoform_common::error::{Result, TopoformError};
use topoform_common::types::UnitState;

use crate::backend::ProvisioningBackend;
use crate::graph::{CompositionGraph, EdgeKind};
use crate::unit::ProvisioningUnit;
use crate::value::Value;

type BuildFn = Box<dyn FnOnce(&Inputs<'_>) -> Result<ProvisioningUnit>>;

/// Describes how to construct one unit.
pub struct UnitFactory {
    name: String,
    needs: Vec<String>,
    after: Vec<String>,
    build: BuildFn,
}

impl UnitFactory {
    /// Creates a factory for the unit `name`.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&Inputs<'_>) -> Result<ProvisioningUnit> + 'static,
    {
        Self {
            name: name.into(),
            needs: Vec::new(),
            after: Vec::new(),
            build: Box::new(build),
        }
    }

    /// Declares that the factory reads outputs of `unit`. Adds an implicit
    /// dependency edge.
    #[must_use]
    pub fn needs(mut self, unit: impl Into<String>) -> Self {
        self.needs.push(unit.into());
        self
    }

    /// Declares that the unit must be provisioned after `unit` without
    /// reading any of its outputs. Adds an explicit dependency edge.
    #[must_use]
    pub fn after(mut self, unit: impl Into<String>) -> Self {
        self.after.push(unit.into());
        self
    }

    /// Returns the name of the unit this factory builds.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for UnitFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitFactory")
            .field("name", &self.name)
            .field("needs", &self.needs)
            .field("after", &self.after)
            .finish_non_exhaustive()
    }
}

/// Read-only view of the units a factory declared as needs.
#[derive(Debug)]
pub struct Inputs<'a> {
    unit: &'a str,
    needs: &'a [String],
    graph: &'a CompositionGraph,
}

impl<'a> Inputs<'a> {
    /// Returns the name of the unit being constructed.
    #[must_use]
    pub const fn unit_name(&self) -> &str {
        self.unit
    }

    /// Returns a constructed unit this factory needs.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::Config`] if `name` was not declared as a need.
    pub fn unit(&self, name: &str) -> Result<&'a ProvisioningUnit> {
        if !self.needs.iter().any(|need| need == name) {
            return Err(TopoformError::Config {
                message: format!(
                    "unit \"{}\" reads \"{name}\" without declaring it as a need",
                    self.unit
                ),
            });
        }
        self.graph
            .unit(name)
            .ok_or_else(|| TopoformError::UnknownUnit {
                name: name.to_owned(),
            })
    }

    /// Returns one output of a unit this factory needs.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::Config`] if `unit` is not a declared need or
    /// has no output named `output`.
    pub fn output(&self, unit: &str, output: &str) -> Result<&'a Value> {
        self.unit(unit)?
            .output(output)
            .ok_or_else(|| TopoformError::Config {
                message: format!("unit \"{unit}\" has no output \"{output}\""),
            })
    }
}

/// Drives one composition pass.
#[derive(Debug, Default)]
pub struct Orchestrator {
    factories: Vec<UnitFactory>,
}

impl Orchestrator {
    /// Creates an orchestrator with no factories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory.
    #[must_use]
    pub fn with_factory(mut self, factory: UnitFactory) -> Self {
        self.factories.push(factory);
        self
    }

    /// Adds every factory in `factories`, keeping their order.
    #[must_use]
    pub fn with_factories(mut self, factories: impl IntoIterator<Item = UnitFactory>) -> Self {
        self.factories.extend(factories);
        self
    }

    /// Builds all units in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::DuplicateUnit`], [`TopoformError::UnknownUnit`]
    /// or [`TopoformError::CyclicDependency`] if the declared graph is
    /// invalid, and [`TopoformError::FactoryFailure`] if a factory fails or
    /// returns an inconsistent unit. Nothing is built after a failure.
    pub fn compose(self) -> Result<Composition> {
        let mut graph = CompositionGraph::new();
        let mut states = BTreeMap::new();

        for factory in &self.factories {
            graph.add_unit(ProvisioningUnit::declared(factory.name()))?;
            let _ = states.insert(factory.name.clone(), UnitState::Declared);
        }
        for factory in &self.factories {
            for need in &factory.needs {
                graph.add_edge(&factory.name, need, EdgeKind::Implicit)?;
            }
            for before in &factory.after {
                graph.add_edge(&factory.name, before, EdgeKind::Explicit)?;
            }
        }

        let order = graph.finalize()?;
        for name in &order {
            advance(&mut states, name, UnitState::Ordered)?;
        }

        let mut factories: HashMap<String, UnitFactory> = self
            .factories
            .into_iter()
            .map(|factory| (factory.name.clone(), factory))
            .collect();
        let mut ready: Vec<String> = Vec::with_capacity(order.len());

        for name in &order {
            let Some(factory) = factories.remove(name) else {
                continue;
            };
            let span = tracing::info_span!("construct", unit = %name);
            let _entered = span.enter();

            advance(&mut states, name, UnitState::Constructing)?;
            let constructed = construct(&graph, &states, factory)
                .and_then(|unit| graph.replace_unit(unit));

            if let Err(source) = constructed {
                advance(&mut states, name, UnitState::Failed)?;
                tracing::error!(error = %source, ready = ready.len(), "unit construction failed");
                return Err(TopoformError::FactoryFailure {
                    unit: name.clone(),
                    instantiated: ready,
                    source: Box::new(source),
                });
            }
            advance(&mut states, name, UnitState::Ready)?;
            ready.push(name.clone());
        }

        tracing::info!(units = ready.len(), "composition complete");
        Ok(Composition {
            graph,
            order,
            states,
        })
    }
}

/// Builds all units produced by `factories` in dependency order.
///
/// # Errors
///
/// See [`Orchestrator::compose`].
pub fn compose(factories: impl IntoIterator<Item = UnitFactory>) -> Result<Composition> {
    Orchestrator::new().with_factories(factories).compose()
}

/// Runs one factory and checks the unit it returns.
fn construct(
    graph: &CompositionGraph,
    states: &BTreeMap<String, UnitState>,
    factory: UnitFactory,
) -> Result<ProvisioningUnit> {
    let UnitFactory {
        name, needs, build, ..
    } = factory;
    let inputs = Inputs {
        unit: &name,
        needs: &needs,
        graph,
    };
    let unit = build(&inputs)?;

    if unit.name() != name {
        return Err(TopoformError::Config {
            message: format!("factory for \"{name}\" produced unit \"{}\"", unit.name()),
        });
    }
    for dependency in unit.dependencies() {
        match states.get(dependency) {
            Some(UnitState::Ready) => {}
            Some(state) => {
                return Err(TopoformError::Config {
                    message: format!(
                        "unit \"{name}\" consumes \"{dependency}\" which is {state}, not ready"
                    ),
                });
            }
            None => {
                return Err(TopoformError::UnknownUnit {
                    name: dependency.clone(),
                });
            }
        }
    }
    Ok(unit)
}

fn advance(states: &mut BTreeMap<String, UnitState>, unit: &str, next: UnitState) -> Result<()> {
    let current = states
        .get(unit)
        .copied()
        .ok_or_else(|| TopoformError::UnknownUnit {
            name: unit.to_owned(),
        })?;
    if !current.can_transition_to(next) {
        return Err(TopoformError::Config {
            message: format!("illegal state transition for unit \"{unit}\": {current} -> {next}"),
        });
    }
    let _ = states.insert(unit.to_owned(), next);
    tracing::debug!(unit, from = %current, to = %next, "unit state changed");
    Ok(())
}

/// The result of a successful composition pass.
#[derive(Debug)]
pub struct Composition {
    graph: CompositionGraph,
    order: Vec<String>,
    states: BTreeMap<String, UnitState>,
}

impl Composition {
    /// Returns the finalized dependency graph.
    #[must_use]
    pub const fn graph(&self) -> &CompositionGraph {
        &self.graph
    }

    /// Returns the creation order.
    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns a constructed unit.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&ProvisioningUnit> {
        self.graph.unit(name)
    }

    /// Returns the constructed units in creation order.
    pub fn units_in_order(&self) -> impl Iterator<Item = &ProvisioningUnit> {
        self.order.iter().filter_map(|name| self.graph.unit(name))
    }

    /// Returns the lifecycle state of a unit.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<UnitState> {
        self.states.get(name).copied()
    }

    /// Hands every unit to `backend` in creation order, stopping at the
    /// first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the backend.
    pub fn provision<B: ProvisioningBackend + ?Sized>(&self, backend: &mut B) -> Result<()> {
        for unit in self.units_in_order() {
            tracing::info!(unit = %unit.name(), "handing unit to provisioning backend");
            backend.provision(unit)?;
        }
        Ok(())
    }
}
