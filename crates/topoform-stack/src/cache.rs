//! Multi-AZ Redis replication group in the isolated cache subnets.

use topoform_common::constants;
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;
use crate::network;

/// Unit name.
pub const UNIT: &str = "cache";

/// Returns the factory of the cache unit.
#[must_use]
pub fn factory() -> UnitFactory {
    UnitFactory::new(UNIT, |inputs| {
        let vpc = inputs.output(network::UNIT, "vpc_id")?;
        let subnet = inputs.output(network::UNIT, "cache_subnet")?;
        let security_group = inputs.output(network::UNIT, "cache_security_group")?;

        ProvisioningUnit::builder(UNIT)
            .consumes_all([vpc, subnet, security_group])
            .output("endpoint", platform_ref(UNIT, "PrimaryEndPointAddress"))
            .output("port", Value::concrete(constants::CACHE_PORT))
            .output("node_type", Value::concrete("cache.t4g.medium"))
            .output("subnet_group", subnet.clone())
            .build()
    })
    .needs(network::UNIT)
}
