//! Serverless PostgreSQL cluster and its capacity settings.
//!
//! Capacity is applied by a separate `database-scaling` unit ordered after
//! the cluster: the platform rejects scaling settings on a cluster that is
//! not fully created yet, and nothing in the data flow expresses that.

use topoform_common::constants;
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;
use crate::network;

/// Unit name of the cluster.
pub const UNIT: &str = "database";

/// Unit name of the capacity settings.
pub const SCALING_UNIT: &str = "database-scaling";

/// Minimum serverless capacity, in capacity units.
pub const MIN_CAPACITY: i64 = 2;

/// Maximum serverless capacity, in capacity units.
pub const MAX_CAPACITY: i64 = 16;

/// Returns the factory of the database cluster unit.
#[must_use]
pub fn factory() -> UnitFactory {
    UnitFactory::new(UNIT, |inputs| {
        let vpc = inputs.output(network::UNIT, "vpc_id")?;
        let subnet = inputs.output(network::UNIT, "database_subnet")?;
        let security_group = inputs.output(network::UNIT, "database_security_group")?;

        ProvisioningUnit::builder(UNIT)
            .consumes_all([vpc, subnet, security_group])
            .output("cluster_id", platform_ref(UNIT, "ClusterIdentifier"))
            .output("endpoint", platform_ref(UNIT, "ClusterEndpoint"))
            .output("secret_arn", platform_ref(UNIT, "SecretArn"))
            .output("port", Value::concrete(constants::DATABASE_PORT))
            .output("database_name", Value::concrete(constants::DATABASE_NAME))
            .output("engine", Value::concrete("aurora-postgresql 13.7"))
            .build()
    })
    .needs(network::UNIT)
}

/// Returns the factory of the capacity settings unit.
#[must_use]
pub fn scaling_factory() -> UnitFactory {
    UnitFactory::new(SCALING_UNIT, |_| {
        ProvisioningUnit::builder(SCALING_UNIT)
            .output("min_capacity", Value::concrete(MIN_CAPACITY))
            .output("max_capacity", Value::concrete(MAX_CAPACITY))
            .build()
    })
    .after(UNIT)
}
