//! CDN distribution in front of the load balancer, with uploaded assets
//! served straight from the public bucket, and the DNS alias record.

use topoform_common::config::{StackConfig, require};
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;
use crate::{certificate, compute, storage};

/// Unit name.
pub const UNIT: &str = "cdn";

/// Path patterns served from the public bucket instead of the load balancer.
pub const BUCKET_PATHS: [&str; 3] = ["assets/*", "optimized/*", "original/*"];

/// Returns the factory of the CDN unit.
///
/// The distribution is created only once the listener rule exists, so the
/// origin never answers with the listener's default 403.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let domain_name = config.domain_name.clone();
    let header = config.alb_header_check_header.clone();
    let header_value = config.alb_header_check_value.clone();
    UnitFactory::new(UNIT, move |inputs| {
        let domain_name = require("domain_name", &domain_name)?;
        let origin = inputs.output(compute::LOAD_BALANCER_UNIT, "dns_name")?;
        let certificate_arn = inputs.output(certificate::UNIT, "certificate_arn")?;
        let bucket_domain = inputs.output(storage::UNIT, "public_bucket_domain")?;
        let zone = inputs.output(certificate::UNIT, "hosted_zone_id")?;

        ProvisioningUnit::builder(UNIT)
            .consumes_all([origin, certificate_arn, bucket_domain])
            .output("distribution_id", platform_ref(UNIT, "DistributionId"))
            .output("distribution_domain_name", platform_ref(UNIT, "DomainName"))
            .output("alias_record", Value::concrete(domain_name))
            .output("hosted_zone_id", zone.clone())
            .output(
                "origin_header",
                Value::concrete(format!("{header}: {header_value}")),
            )
            .output("bucket_paths", Value::concrete(BUCKET_PATHS.join(",")))
            .build()
    })
    .needs(compute::LOAD_BALANCER_UNIT)
    .needs(certificate::UNIT)
    .needs(storage::UNIT)
    .after(compute::LISTENER_RULE_UNIT)
}
