//! Application network: one VPC across two availability zones with a
//! public subnet and three private tiers, plus the security groups that
//! chain load balancer, instances, database and cache.

use topoform_common::config::StackConfig;
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;

/// Unit name.
pub const UNIT: &str = "network";

/// Subnet group hosting the load balancer and the NAT gateway.
pub const PUBLIC_SUBNET: &str = "public";
/// Subnet group of the application instances.
pub const INSTANCE_SUBNET: &str = "private-ec2";
/// Isolated subnet group of the database cluster.
pub const DATABASE_SUBNET: &str = "private-aurora";
/// Isolated subnet group of the cache.
pub const CACHE_SUBNET: &str = "private-redis";

/// Returns the factory of the network unit.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let cidr = config.cidr.clone();
    UnitFactory::new(UNIT, move |_| {
        ProvisioningUnit::builder(UNIT)
            .output("vpc_id", platform_ref(UNIT, "VpcId"))
            .output("cidr", Value::concrete(cidr))
            .output("public_subnet", Value::concrete(PUBLIC_SUBNET))
            .output("instance_subnet", Value::concrete(INSTANCE_SUBNET))
            .output("database_subnet", Value::concrete(DATABASE_SUBNET))
            .output("cache_subnet", Value::concrete(CACHE_SUBNET))
            .output(
                "load_balancer_security_group",
                platform_ref(UNIT, "LoadBalancerSecurityGroupId"),
            )
            .output(
                "instance_security_group",
                platform_ref(UNIT, "InstanceSecurityGroupId"),
            )
            .output(
                "database_security_group",
                platform_ref(UNIT, "DatabaseSecurityGroupId"),
            )
            .output("cache_security_group", platform_ref(UNIT, "CacheSecurityGroupId"))
            .build()
    })
}
