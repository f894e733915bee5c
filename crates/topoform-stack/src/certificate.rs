//! DNS-validated TLS certificate for the public domain.

use topoform_common::config::{StackConfig, require};
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;

/// Unit name.
pub const UNIT: &str = "certificate";

/// Returns the factory of the certificate unit. Fails when no domain name
/// is configured.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let domain_name = config.domain_name.clone();
    let hosted_zone_id = config.hosted_zone_id.clone();
    UnitFactory::new(UNIT, move |_| {
        let domain_name = require("domain_name", &domain_name)?;
        ProvisioningUnit::builder(UNIT)
            .output("domain_name", Value::concrete(domain_name))
            .output("hosted_zone_id", Value::concrete(hosted_zone_id))
            .output("certificate_arn", platform_ref(UNIT, "CertificateArn"))
            .build()
    })
}
