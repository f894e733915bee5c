//! # topoform-stack
//!
//! The web application topology: a forum behind a CDN, served by an
//! autoscaling group of instances in a private network, backed by a
//! PostgreSQL cluster, a Redis cache, object storage, an identity provider
//! and a verified mail domain.
//!
//! Each unit is defined independently as a [`UnitFactory`]; the composition
//! engine wires them by the outputs they read.

pub mod bootstrap;
pub mod cache;
pub mod cdn;
pub mod certificate;
pub mod compute;
pub mod database;
pub mod identity;
pub mod lookup;
pub mod mail;
pub mod network;
pub mod storage;

use topoform_common::config::StackConfig;
use topoform_common::error::Result;
use topoform_compose::{Composition, UnitFactory, compose};

pub use bootstrap::bootstrap_template;

/// Returns the factories of every unit of the web application, in
/// declaration order.
#[must_use]
pub fn web_application(config: &StackConfig) -> Vec<UnitFactory> {
    vec![
        certificate::factory(config),
        identity::factory(config),
        mail::factory(config),
        network::factory(config),
        cache::factory(),
        database::factory(),
        database::scaling_factory(),
        storage::factory(),
        compute::load_balancer_factory(),
        bootstrap::factory(config),
        compute::autoscaling_group_factory(),
        compute::listener_rule_factory(config),
        cdn::factory(config),
    ]
}

/// Composes the web application for `config`.
///
/// # Errors
///
/// Returns the first composition error, including presence check failures
/// of individual units.
pub fn compose_web_application(config: &StackConfig) -> Result<Composition> {
    tracing::info!(stack = %config.stack_id, region = %config.region, "composing web application");
    compose(web_application(config))
}
