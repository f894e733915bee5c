//! Dependency graph management using `petgraph`.
//!
//! Units are graph nodes; an edge points from a dependency to its dependent
//! so that a topological walk yields dependencies first. Node indices follow
//! registration order, which is also the tie-break when several units become
//! ready at once.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use petgraph::Direction;
use petgraph::dot::Dot;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use topoform_common::error::{Result, TopoformError};

use crate::unit::ProvisioningUnit;

/// How a dependency edge came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Inferred from data flow: the dependent consumes the dependency's outputs.
    Implicit,
    /// An ordering constraint with no data flow.
    Explicit,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => write!(f, "implicit"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

/// A dependency graph of provisioning units.
#[derive(Debug, Default)]
pub struct CompositionGraph {
    /// Internal petgraph representation.
    graph: Graph<ProvisioningUnit, EdgeKind>,
    /// Node lookup by unit name.
    index: HashMap<String, NodeIndex>,
    /// Dependents waiting for a dependency that is not registered yet.
    pending: Vec<(NodeIndex, String, EdgeKind)>,
    /// Creation order, fixed by [`CompositionGraph::finalize`].
    order: Option<Vec<String>>,
}

impl CompositionGraph {
    /// Creates an empty composition graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit.
    ///
    /// Dependencies the unit declares become edges of the kind the unit
    /// records for them: implicit when consumed, explicit when only
    /// declared through [`crate::unit::UnitBuilder::depends_on`]. A dependency
    /// on a unit that is not registered yet is connected once that unit is
    /// added; if it never is, [`CompositionGraph::resolve_order`] reports it.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::DuplicateUnit`] if the name is taken, or
    /// [`TopoformError::Config`] if the graph is finalized.
    pub fn add_unit(&mut self, unit: ProvisioningUnit) -> Result<()> {
        self.ensure_open()?;
        if self.index.contains_key(unit.name()) {
            return Err(TopoformError::DuplicateUnit {
                name: unit.name().to_owned(),
            });
        }

        let name = unit.name().to_owned();
        let dependencies: Vec<(String, EdgeKind)> = unit
            .dependencies()
            .iter()
            .map(|dependency| {
                let kind = unit
                    .dependency_kind(dependency)
                    .unwrap_or(EdgeKind::Implicit);
                (dependency.clone(), kind)
            })
            .collect();
        let idx = self.graph.add_node(unit);
        let _ = self.index.insert(name.clone(), idx);

        for (dependency, kind) in &dependencies {
            self.connect(idx, dependency, *kind);
        }

        let (satisfied, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, wanted, _)| *wanted == name);
        self.pending = waiting;
        for (dependent, _, kind) in satisfied {
            self.link(idx, dependent, kind);
        }

        tracing::debug!(unit = %name, dependencies = dependencies.len(), "registered unit");
        Ok(())
    }

    /// Records an explicit ordering edge: `from` is provisioned after `to`.
    ///
    /// An edge that already exists is accepted and not duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::UnknownUnit`] if either unit is absent,
    /// [`TopoformError::CyclicDependency`] if `from == to`, or
    /// [`TopoformError::Config`] if the graph is finalized.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<()> {
        self.add_edge(from, to, EdgeKind::Explicit)
    }

    /// Records an edge of the given kind between two registered units.
    pub(crate) fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> Result<()> {
        self.ensure_open()?;
        let dependent = self.node(from)?;
        let dependency = self.node(to)?;
        if dependent == dependency {
            return Err(TopoformError::CyclicDependency {
                members: vec![from.to_owned()],
            });
        }

        let _ = self.graph[dependent].record_dependency(to, kind);
        self.link(dependency, dependent, kind);
        tracing::debug!(from, to, %kind, "added dependency");
        Ok(())
    }

    /// Computes a deterministic creation order.
    ///
    /// Kahn's algorithm; whenever several units have no unresolved
    /// dependency left, the one registered first is released first.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::UnknownUnit`] if a declared dependency was
    /// never registered, or [`TopoformError::CyclicDependency`] naming every
    /// unit that takes part in a cycle.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        if let Some((_, missing, _)) = self.pending.first() {
            return Err(TopoformError::UnknownUnit {
                name: missing.clone(),
            });
        }

        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(self.graph[idx].name().to_owned());
            for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let remaining = &mut in_degree[dependent.index()];
                *remaining -= 1;
                if *remaining == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < self.graph.node_count() {
            return Err(TopoformError::CyclicDependency {
                members: self.cycle_members(),
            });
        }
        Ok(order)
    }

    /// Resolves and fixes the creation order. Afterwards no unit or edge can
    /// be added. Calling it again returns the same order.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`CompositionGraph::resolve_order`].
    pub fn finalize(&mut self) -> Result<Vec<String>> {
        if let Some(order) = &self.order {
            return Ok(order.clone());
        }
        let order = self.resolve_order()?;
        tracing::info!(units = order.len(), "composition graph finalized");
        self.order = Some(order.clone());
        Ok(order)
    }

    /// Returns the fixed creation order, if the graph is finalized.
    #[must_use]
    pub fn order(&self) -> Option<&[String]> {
        self.order.as_deref()
    }

    /// Returns the unit registered under `name`.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&ProvisioningUnit> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Returns the number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns whether no unit is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the units `name` must follow, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::UnknownUnit`] if `name` is not registered.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<&str>> {
        Ok(self.neighbors(self.node(name)?, Direction::Incoming))
    }

    /// Returns the units that must follow `name`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`TopoformError::UnknownUnit`] if `name` is not registered.
    pub fn dependents_of(&self, name: &str) -> Result<Vec<&str>> {
        Ok(self.neighbors(self.node(name)?, Direction::Outgoing))
    }

    /// Returns the kind of the edge making `from` follow `to`, if any.
    #[must_use]
    pub fn edge_kind(&self, from: &str, to: &str) -> Option<EdgeKind> {
        let dependent = *self.index.get(from)?;
        let dependency = *self.index.get(to)?;
        self.graph
            .find_edge(dependency, dependent)
            .map(|edge| self.graph[edge])
    }

    /// Renders the graph in Graphviz DOT format, edges labelled by kind.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let view = self
            .graph
            .map(|_, unit| unit.name().to_owned(), |_, kind| *kind);
        format!("{}", Dot::with_config(&view, &[]))
    }

    /// Swaps a registered unit for its constructed version, connecting any
    /// dependency it declares and keeping the edges already recorded for the
    /// placeholder. Allowed after finalization because the orchestrator only
    /// accepts dependencies that precede the unit in the fixed order.
    ///
    /// An edge that already exists keeps its kind, and the unit's record is
    /// brought in line with it.
    pub(crate) fn replace_unit(&mut self, unit: ProvisioningUnit) -> Result<()> {
        let idx = self.node(unit.name())?;
        let mut dependencies = Vec::with_capacity(unit.dependencies().len());
        for dependency in unit.dependencies() {
            let kind = unit
                .dependency_kind(dependency)
                .unwrap_or(EdgeKind::Implicit);
            dependencies.push((self.node(dependency)?, kind));
        }
        for (dependency, kind) in dependencies {
            self.link(dependency, idx, kind);
        }
        let previous = std::mem::replace(&mut self.graph[idx], unit);
        for dependency in previous.dependencies() {
            let kind = previous
                .dependency_kind(dependency)
                .unwrap_or(EdgeKind::Implicit);
            let _ = self.graph[idx].record_dependency(dependency, kind);
        }

        let kinds: Vec<(String, EdgeKind)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| (self.graph[edge.source()].name().to_owned(), *edge.weight()))
            .collect();
        for (dependency, kind) in kinds {
            self.graph[idx].set_dependency_kind(&dependency, kind);
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.order.is_some() {
            return Err(TopoformError::Config {
                message: "composition graph is finalized".into(),
            });
        }
        Ok(())
    }

    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TopoformError::UnknownUnit {
                name: name.to_owned(),
            })
    }

    fn connect(&mut self, dependent: NodeIndex, dependency: &str, kind: EdgeKind) {
        match self.index.get(dependency) {
            Some(&idx) => self.link(idx, dependent, kind),
            None => self.pending.push((dependent, dependency.to_owned(), kind)),
        }
    }

    fn link(&mut self, dependency: NodeIndex, dependent: NodeIndex, kind: EdgeKind) {
        if self.graph.find_edge(dependency, dependent).is_none() {
            let _ = self.graph.add_edge(dependency, dependent, kind);
        }
    }

    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<&str> {
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort_unstable();
        found.into_iter().map(|n| self.graph[n].name()).collect()
    }

    fn cycle_members(&self) -> Vec<String> {
        let mut members: Vec<NodeIndex> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect();
        members.sort_unstable();
        members
            .into_iter()
            .map(|idx| self.graph[idx].name().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::value::Value;

    fn unit(name: &str) -> ProvisioningUnit {
        ProvisioningUnit::declared(name)
    }

    fn unit_after(name: &str, dependencies: &[&str]) -> ProvisioningUnit {
        dependencies
            .iter()
            .fold(ProvisioningUnit::builder(name), |b, dep| {
                b.consumes(&Value::deferred(*dep, format!("${{{dep}.Id}}")))
            })
            .build()
            .expect("should build")
    }

    #[test]
    fn empty_graph_resolves_to_empty() {
        let graph = CompositionGraph::new();
        let order = graph.resolve_order().expect("should resolve");
        assert!(order.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn single_node_resolves() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(order, vec!["network"]);
    }

    #[test]
    fn linear_dependency_chain() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit_after("bootstrap", &["database"])).expect("add");
        graph.add_unit(unit_after("database", &["network"])).expect("add");
        graph.add_unit(unit("network")).expect("add");

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(order, vec!["network", "database", "bootstrap"]);
    }

    #[test]
    fn diamond_dependency() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit_after("a", &["b", "c"])).expect("add");
        graph.add_unit(unit_after("b", &["d"])).expect("add");
        graph.add_unit(unit_after("c", &["d"])).expect("add");
        graph.add_unit(unit("d")).expect("add");

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(order, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn ready_units_follow_registration_order() {
        let mut graph = CompositionGraph::new();
        for name in ["storage", "identity", "network", "mail"] {
            graph.add_unit(unit(name)).expect("add");
        }
        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(order, vec!["storage", "identity", "network", "mail"]);
    }

    #[test]
    fn released_units_respect_registration_order_not_release_time() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("root")).expect("add");
        graph.add_unit(unit_after("late", &["root"])).expect("add");
        graph.add_unit(unit("independent")).expect("add");

        let order = graph.resolve_order().expect("should resolve");
        assert_eq!(order, vec!["root", "late", "independent"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let build = || {
            let mut graph = CompositionGraph::new();
            graph.add_unit(unit_after("cdn", &["lb", "storage"])).expect("add");
            graph.add_unit(unit_after("lb", &["network"])).expect("add");
            graph.add_unit(unit("storage")).expect("add");
            graph.add_unit(unit("network")).expect("add");
            graph
        };
        let first = build().resolve_order().expect("resolve");
        for _ in 0..10 {
            assert_eq!(build().resolve_order().expect("resolve"), first);
        }
    }

    #[test]
    fn two_node_cycle_detection() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit_after("a", &["b"])).expect("add");
        graph.add_unit(unit_after("b", &["a"])).expect("add");

        let err = graph.resolve_order().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cyclic"), "got: {msg}");
    }

    #[test]
    fn three_node_cycle_names_exactly_its_members() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("root")).expect("add");
        graph.add_unit(unit_after("a", &["c", "root"])).expect("add");
        graph.add_unit(unit_after("b", &["a"])).expect("add");
        graph.add_unit(unit_after("c", &["b"])).expect("add");
        graph.add_unit(unit_after("tail", &["a"])).expect("add");

        match graph.resolve_order() {
            Err(TopoformError::CyclicDependency { members }) => {
                assert_eq!(members, vec!["a", "b", "c"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn explicit_edge_can_close_a_cycle() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("a")).expect("add");
        graph.add_unit(unit_after("b", &["a"])).expect("add");
        graph.add_dependency("a", "b").expect("edge");

        assert!(matches!(
            graph.resolve_order(),
            Err(TopoformError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn duplicate_unit_is_rejected() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        let err = graph.add_unit(unit("network")).unwrap_err();
        assert!(
            matches!(err, TopoformError::DuplicateUnit { ref name } if name == "network"),
            "got: {err}"
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn add_dependency_requires_both_units() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("bootstrap")).expect("add");
        let err = graph.add_dependency("bootstrap", "network").unwrap_err();
        assert!(
            matches!(err, TopoformError::UnknownUnit { ref name } if name == "network"),
            "got: {err}"
        );
        let err = graph.add_dependency("ghost", "bootstrap").unwrap_err();
        assert!(matches!(err, TopoformError::UnknownUnit { ref name } if name == "ghost"));
    }

    #[test]
    fn add_dependency_on_self_is_a_cycle() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        assert!(matches!(
            graph.add_dependency("network", "network"),
            Err(TopoformError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn redundant_explicit_edge_is_accepted() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        graph.add_unit(unit_after("bootstrap", &["network"])).expect("add");
        graph.add_dependency("bootstrap", "network").expect("redundant edge");

        assert_eq!(graph.edge_kind("bootstrap", "network"), Some(EdgeKind::Implicit));
        assert_eq!(graph.dependencies_of("bootstrap").expect("deps"), vec!["network"]);
        assert_eq!(
            graph.resolve_order().expect("resolve"),
            vec!["network", "bootstrap"]
        );
    }

    #[test]
    fn depends_on_edges_are_explicit() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("a")).expect("add");
        let b = ProvisioningUnit::builder("b")
            .depends_on("a")
            .build()
            .expect("build");
        graph.add_unit(b).expect("add");

        assert_eq!(graph.edge_kind("b", "a"), Some(EdgeKind::Explicit));
        assert!(graph.to_dot().contains("explicit"));
    }

    #[test]
    fn pending_depends_on_edge_stays_explicit() {
        let mut graph = CompositionGraph::new();
        let listener = ProvisioningUnit::builder("listener")
            .depends_on("network")
            .build()
            .expect("build");
        graph.add_unit(listener).expect("add");
        graph.add_unit(unit_after("cache", &["network"])).expect("add");
        graph.add_unit(unit("network")).expect("add");

        assert_eq!(graph.edge_kind("listener", "network"), Some(EdgeKind::Explicit));
        assert_eq!(graph.edge_kind("cache", "network"), Some(EdgeKind::Implicit));
    }

    #[test]
    fn explicit_edge_is_recorded_on_the_unit() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("database")).expect("add");
        graph.add_unit(unit("scaling")).expect("add");
        graph.add_dependency("scaling", "database").expect("edge");

        assert_eq!(graph.edge_kind("scaling", "database"), Some(EdgeKind::Explicit));
        let scaling = graph.unit("scaling").expect("unit");
        assert!(scaling.dependencies().contains("database"));
        assert_eq!(scaling.dependency_kind("database"), Some(EdgeKind::Explicit));
        assert_eq!(graph.dependents_of("database").expect("dependents"), vec!["scaling"]);
    }

    #[test]
    fn unregistered_dependency_fails_resolution() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit_after("cache", &["network"])).expect("add");
        let err = graph.resolve_order().unwrap_err();
        assert!(
            matches!(err, TopoformError::UnknownUnit { ref name } if name == "network"),
            "got: {err}"
        );
    }

    #[test]
    fn late_registration_satisfies_pending_dependency() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit_after("cache", &["network"])).expect("add");
        graph.add_unit(unit("network")).expect("add");
        assert_eq!(
            graph.resolve_order().expect("resolve"),
            vec!["network", "cache"]
        );
    }

    #[test]
    fn finalize_fixes_order_and_closes_graph() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        graph.add_unit(unit_after("cache", &["network"])).expect("add");

        let order = graph.finalize().expect("finalize");
        assert_eq!(graph.order(), Some(order.as_slice()));
        assert_eq!(graph.finalize().expect("again"), order);
        assert!(matches!(
            graph.add_unit(unit("late")),
            Err(TopoformError::Config { .. })
        ));
        assert!(matches!(
            graph.add_dependency("cache", "network"),
            Err(TopoformError::Config { .. })
        ));
    }

    #[test]
    fn replace_unit_keeps_node_and_adds_edges() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("database")).expect("add");
        graph.add_unit(unit("bootstrap")).expect("add");

        let built = ProvisioningUnit::builder("bootstrap")
            .consumes(&Value::deferred("database", "lookup(db.host)"))
            .output("user_data", Value::concrete("#!/bin/bash"))
            .build()
            .expect("build");
        graph.replace_unit(built).expect("replace");

        assert_eq!(graph.len(), 2);
        assert!(graph.unit("bootstrap").expect("unit").output("user_data").is_some());
        assert_eq!(graph.edge_kind("bootstrap", "database"), Some(EdgeKind::Implicit));
    }

    #[test]
    fn replace_unit_keeps_recorded_dependencies() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        graph.add_unit(unit("listener")).expect("add");
        graph.add_dependency("listener", "network").expect("edge");

        graph
            .replace_unit(ProvisioningUnit::declared("listener"))
            .expect("replace");
        let listener = graph.unit("listener").expect("unit");
        assert!(listener.dependencies().contains("network"));
        assert_eq!(listener.dependency_kind("network"), Some(EdgeKind::Explicit));
        assert_eq!(graph.edge_kind("listener", "network"), Some(EdgeKind::Explicit));
    }

    #[test]
    fn replace_unit_links_depends_on_as_explicit() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("database")).expect("add");
        graph.add_unit(unit("network")).expect("add");
        graph.add_unit(unit("scaling")).expect("add");
        graph.add_dependency("scaling", "network").expect("edge");

        let built = ProvisioningUnit::builder("scaling")
            .depends_on("database")
            .consumes(&Value::deferred("network", "${network.VpcId}"))
            .build()
            .expect("build");
        graph.replace_unit(built).expect("replace");

        assert_eq!(graph.edge_kind("scaling", "database"), Some(EdgeKind::Explicit));
        assert_eq!(graph.edge_kind("scaling", "network"), Some(EdgeKind::Explicit));
        let scaling = graph.unit("scaling").expect("unit");
        assert_eq!(scaling.dependency_kind("network"), Some(EdgeKind::Explicit));
    }

    #[test]
    fn dot_output_labels_edges() {
        let mut graph = CompositionGraph::new();
        graph.add_unit(unit("network")).expect("add");
        graph.add_unit(unit("bootstrap")).expect("add");
        graph.add_dependency("bootstrap", "network").expect("edge");

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"), "got: {dot}");
        assert!(dot.contains("network"));
        assert!(dot.contains("explicit"));
    }

    /// A registration order and a set of edges that only point from a lower
    /// to a higher unit number, so the graph is always acyclic.
    fn acyclic_graph() -> impl Strategy<Value = (Vec<usize>, Vec<(usize, usize, bool)>)> {
        (1_usize..12).prop_flat_map(|n| {
            let registration = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
            let edges = proptest::collection::vec((0..n, 0..n, any::<bool>()), 0..n * 2);
            (registration, edges)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            .. ProptestConfig::default()
        })]

        #[test]
        fn every_unit_follows_its_dependencies((registration, edges) in acyclic_graph()) {
            let edges: Vec<(String, String, bool)> = edges
                .into_iter()
                .filter(|(a, b, _)| a != b)
                .map(|(a, b, explicit)| {
                    let (dependency, dependent) = (a.min(b), a.max(b));
                    (format!("u{dependent}"), format!("u{dependency}"), explicit)
                })
                .collect();

            let mut graph = CompositionGraph::new();
            for i in &registration {
                let name = format!("u{i}");
                let consumed: Vec<&str> = edges
                    .iter()
                    .filter(|(from, _, explicit)| *from == name && !explicit)
                    .map(|(_, to, _)| to.as_str())
                    .collect();
                graph.add_unit(unit_after(&name, &consumed)).expect("add");
            }
            for (from, to, explicit) in &edges {
                if *explicit {
                    graph.add_dependency(from, to).expect("edge");
                }
            }

            let order = graph.resolve_order().expect("acyclic graph resolves");
            prop_assert_eq!(order.len(), registration.len());
            let position = |name: &str| order.iter().position(|n| n == name);
            for (from, to, _) in &edges {
                prop_assert!(
                    position(to) < position(from),
                    "{} ordered before its dependency {}", from, to
                );
            }
            prop_assert_eq!(graph.resolve_order().expect("resolve again"), order);
        }
    }
}
