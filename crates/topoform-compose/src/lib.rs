//! # topoform-compose
//!
//! Composition engine for independently defined provisioning units.
//!
//! Handles:
//! - **Value**: Outputs known at composition time and deferred outputs that
//!   only resolve once the owning unit exists on the target platform.
//! - **Unit**: Named provisioning units with outputs and dependency edges.
//! - **Graph**: Dependency graph construction and deterministic topological
//!   resolution.
//! - **Template**: Placeholder templates rendered against a binding, with
//!   deferred values emitted as runtime-resolution expressions.
//! - **Orchestrator**: Dependency-ordered construction of units from factories.
//! - **Backend**: The narrow interface to the provisioning backend.

pub mod backend;
pub mod graph;
pub mod orchestrator;
pub mod template;
pub mod unit;
pub mod value;

pub use backend::{PlanEntry, PlanRecorder, ProvisioningBackend};
pub use graph::{CompositionGraph, EdgeKind};
pub use orchestrator::{Composition, Inputs, Orchestrator, UnitFactory, compose};
pub use template::{Binding, Segment, Template, render};
pub use unit::{ProvisioningUnit, UnitBuilder};
pub use value::{Literal, Value};
