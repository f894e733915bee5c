//! User pool and OpenID Connect client used for single sign-on.

use topoform_common::config::{StackConfig, require};
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::platform_ref;

/// Unit name.
pub const UNIT: &str = "identity";

/// Returns the factory of the identity unit.
///
/// The client secret is generated by the platform and never leaves it; the
/// unit exposes it as a lookup the instance runs at boot.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let sub_domain = config.auth_sub_domain_name.clone();
    let region = config.region.clone();
    let domain_name = config.domain_name.clone();
    UnitFactory::new(UNIT, move |_| {
        let sub_domain = require("auth_sub_domain_name", &sub_domain)?;
        let region = require("region", &region)?;

        let user_pool_id = platform_ref(UNIT, "UserPoolId");
        let client_id = platform_ref(UNIT, "UserPoolClientId");
        let client_secret = Value::deferred(
            UNIT,
            format!(
                "$(aws cognito-idp describe-user-pool-client --region {region} \
                 --user-pool-id={user_pool_id} --client-id={client_id} \
                 --query UserPoolClient.ClientSecret --output text)"
            ),
        );
        let discovery_document = user_pool_id.derive(|pool| {
            format!("https://cognito-idp.{region}.amazonaws.com/{pool}/.well-known/openid-configuration")
        });

        ProvisioningUnit::builder(UNIT)
            .output(
                "auth_domain",
                Value::concrete(format!("https://{sub_domain}.auth.{region}.amazoncognito.com")),
            )
            .output(
                "callback_url",
                Value::concrete(format!("https://{domain_name}/auth/oidc/callback")),
            )
            .output("user_pool_arn", platform_ref(UNIT, "UserPoolArn"))
            .output("user_pool_id", user_pool_id)
            .output("client_id", client_id)
            .output("client_secret", client_secret)
            .output("discovery_document", discovery_document)
            .build()
    })
}
