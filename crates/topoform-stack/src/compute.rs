//! Compute tier: the internet-facing load balancer, the autoscaling group
//! of application instances, and the listener rule that forwards traffic
//! carrying the CDN origin header to the group.

use topoform_common::config::{StackConfig, require};
use topoform_common::constants;
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;
use crate::{bootstrap, certificate, network};

/// Unit name of the load balancer.
pub const LOAD_BALANCER_UNIT: &str = "load-balancer";

/// Unit name of the autoscaling group.
pub const AUTOSCALING_GROUP_UNIT: &str = "autoscaling-group";

/// Unit name of the listener rule.
pub const LISTENER_RULE_UNIT: &str = "listener-rule";

/// Returns the factory of the load balancer unit.
///
/// Its HTTPS listener answers 403 to anything the listener rule does not
/// forward.
#[must_use]
pub fn load_balancer_factory() -> UnitFactory {
    UnitFactory::new(LOAD_BALANCER_UNIT, |inputs| {
        let vpc = inputs.output(network::UNIT, "vpc_id")?;
        let subnet = inputs.output(network::UNIT, "public_subnet")?;
        let security_group = inputs.output(network::UNIT, "load_balancer_security_group")?;
        let certificate_arn = inputs.output(certificate::UNIT, "certificate_arn")?;

        ProvisioningUnit::builder(LOAD_BALANCER_UNIT)
            .consumes_all([vpc, subnet, security_group, certificate_arn])
            .output("arn", platform_ref(LOAD_BALANCER_UNIT, "LoadBalancerArn"))
            .output("dns_name", platform_ref(LOAD_BALANCER_UNIT, "DNSName"))
            .output(
                "listener_arn",
                platform_ref(LOAD_BALANCER_UNIT, "HttpsListenerArn"),
            )
            .output("listener_port", Value::concrete(constants::HTTPS_PORT))
            .output("idle_timeout_seconds", Value::concrete(60_i64))
            .build()
    })
    .needs(network::UNIT)
    .needs(certificate::UNIT)
}

/// Returns the factory of the autoscaling group unit.
#[must_use]
pub fn autoscaling_group_factory() -> UnitFactory {
    UnitFactory::new(AUTOSCALING_GROUP_UNIT, |inputs| {
        let vpc = inputs.output(network::UNIT, "vpc_id")?;
        let subnet = inputs.output(network::UNIT, "instance_subnet")?;
        let security_group = inputs.output(network::UNIT, "instance_security_group")?;
        let user_data = inputs.output(bootstrap::UNIT, "user_data")?;
        let digest = inputs.output(bootstrap::UNIT, "user_data_digest")?;

        ProvisioningUnit::builder(AUTOSCALING_GROUP_UNIT)
            .consumes_all([vpc, subnet, security_group, user_data])
            .output(
                "group_name",
                platform_ref(AUTOSCALING_GROUP_UNIT, "AutoScalingGroupName"),
            )
            .output("instance_type", Value::concrete("t3.medium"))
            .output("min_capacity", Value::concrete(1_i64))
            .output("max_capacity", Value::concrete(2_i64))
            .output("health_check_grace_minutes", Value::concrete(25_i64))
            .output("user_data_digest", digest.clone())
            .build()
    })
    .needs(network::UNIT)
    .needs(bootstrap::UNIT)
}

/// Returns the factory of the listener rule unit.
///
/// The rule attaches the instances to the load balancer only after both
/// exist, which is why it is its own unit.
#[must_use]
pub fn listener_rule_factory(config: &StackConfig) -> UnitFactory {
    let header = config.alb_header_check_header.clone();
    let header_value = config.alb_header_check_value.clone();
    UnitFactory::new(LISTENER_RULE_UNIT, move |inputs| {
        let header = require("alb_header_check_header", &header)?;
        let header_value = require("alb_header_check_value", &header_value)?;
        let vpc = inputs.output(network::UNIT, "vpc_id")?;
        let listener_arn = inputs.output(LOAD_BALANCER_UNIT, "listener_arn")?;
        let group_name = inputs.output(AUTOSCALING_GROUP_UNIT, "group_name")?;

        ProvisioningUnit::builder(LISTENER_RULE_UNIT)
            .consumes_all([vpc, listener_arn, group_name])
            .output(
                "target_group_arn",
                platform_ref(LISTENER_RULE_UNIT, "TargetGroupArn"),
            )
            .output("target_port", Value::concrete(constants::APP_PORT))
            .output("priority", Value::concrete(1_i64))
            .output("header_name", Value::concrete(header))
            .output("header_value", Value::concrete(header_value))
            .output("health_check_path", Value::concrete("/"))
            .build()
    })
    .needs(network::UNIT)
    .needs(LOAD_BALANCER_UNIT)
    .needs(AUTOSCALING_GROUP_UNIT)
}
