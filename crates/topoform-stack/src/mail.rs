//! Verified outbound mail domain and the SMTP user the application sends
//! with.

use topoform_common::config::{StackConfig, require};
use topoform_common::constants;
use topoform_compose::{ProvisioningUnit, UnitFactory, Value};

use crate::lookup::{platform_ref, secret_lookup};

/// Unit name.
pub const UNIT: &str = "mail";

/// Returns the factory of the mail unit.
///
/// The SMTP password is derived on the instance from the stored secret
/// access key of the SMTP user.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let smtp_domain = config.ses_smtp_domain_name.clone();
    let region = config.region.clone();
    UnitFactory::new(UNIT, move |_| {
        let smtp_domain = require("ses_smtp_domain_name", &smtp_domain)?;
        let region = require("region", &region)?;

        let secret_arn = platform_ref(UNIT, "SmtpSecretArn");
        let password = secret_arn.derive(|arn| {
            format!(
                "$(python3 smtp_credentials_generate.py {} {region})",
                secret_lookup(region, arn, "SecretAccessKey")
            )
        });

        ProvisioningUnit::builder(UNIT)
            .output("smtp_domain", Value::concrete(smtp_domain))
            .output(
                "smtp_address",
                Value::concrete(format!("email-smtp.{region}.amazonaws.com")),
            )
            .output("smtp_port", Value::concrete(constants::SMTP_PORT))
            .output("smtp_username", platform_ref(UNIT, "SmtpAccessKeyId"))
            .output("smtp_password", password)
            .output("secret_arn", secret_arn)
            .build()
    })
}

#[cfg(test)]
mod tests {
    use topoform_compose::compose;

    use super::*;

    fn config() -> StackConfig {
        StackConfig {
            region: "us-east-1".into(),
            ses_smtp_domain_name: "mail.example.com".into(),
            ..StackConfig::default()
        }
    }

    #[test]
    fn smtp_password_is_derived_on_the_host() {
        let composition = compose([factory(&config())]).expect("should compose");
        let unit = composition.unit(UNIT).expect("mail unit");
        let password = unit.output("smtp_password").expect("password");

        assert_eq!(password.source_unit(), Some(UNIT));
        let text = password.to_string();
        assert!(text.starts_with("$(python3 smtp_credentials_generate.py $(aws secretsmanager"));
        assert!(text.contains("--secret-id ${mail.SmtpSecretArn}"));
        assert!(text.ends_with(" us-east-1)"));
    }

    #[test]
    fn smtp_endpoint_follows_region() {
        let composition = compose([factory(&config())]).expect("should compose");
        let unit = composition.unit(UNIT).expect("mail unit");
        assert_eq!(
            unit.output("smtp_address"),
            Some(&Value::concrete("email-smtp.us-east-1.amazonaws.com"))
        );
    }

    #[test]
    fn empty_domain_is_rejected() {
        let config = StackConfig {
            ses_smtp_domain_name: String::new(),
            ..config()
        };
        let err = compose([factory(&config)]).unwrap_err();
        assert!(err.to_string().contains("ses_smtp_domain_name must not be empty"));
    }
}
