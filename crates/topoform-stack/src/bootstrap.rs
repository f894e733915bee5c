//! Instance bootstrap script.
//!
//! The script is rendered at composition time from
//! `assets/bootstrap.sh.tpl`. Values the platform assigns later (bucket
//! names, endpoints) stay backend references, and secrets stay lookups the
//! instance runs at boot, so the rendered text never contains a credential.

use topoform_common::config::{StackConfig, require};
use topoform_common::error::Result;
use topoform_common::types::Sha256Digest;
use topoform_compose::{Binding, Inputs, ProvisioningUnit, Template, UnitFactory, Value, render};

use crate::lookup::secret_field;
use crate::{cache, database, identity, mail, storage};

/// Unit name.
pub const UNIT: &str = "bootstrap";

const TEMPLATE: &str = include_str!("../assets/bootstrap.sh.tpl");

/// Parses the bundled bootstrap template.
///
/// # Errors
///
/// Returns [`TemplateSyntax`](topoform_common::error::TopoformError::TemplateSyntax)
/// if the bundled template is malformed.
pub fn bootstrap_template() -> Result<Template> {
    Template::parse(TEMPLATE)
}

/// Configuration values the bootstrap script embeds.
#[derive(Debug, Clone)]
struct Settings {
    region: String,
    settings_secret_arn: String,
    domain_name: String,
    developer_emails: String,
    notification_email: String,
}

impl Settings {
    fn from_config(config: &StackConfig) -> Self {
        Self {
            region: config.region.clone(),
            settings_secret_arn: config.settings_secret_arn.clone(),
            domain_name: config.domain_name.clone(),
            developer_emails: config.developer_emails.clone(),
            notification_email: config.notification_email.clone(),
        }
    }

    fn binding(&self, inputs: &Inputs<'_>) -> Result<Binding> {
        let region = require("region", &self.region)?;
        let settings = Value::concrete(require(
            "settings_secret_arn",
            &self.settings_secret_arn,
        )?);
        let database_secret = inputs.output(database::UNIT, "secret_arn")?;

        let mut binding = Binding::new()
            .bind("region", Value::concrete(region))
            .bind(
                "backup_bucket",
                inputs.output(storage::UNIT, "backup_bucket")?.clone(),
            )
            .bind(
                "public_bucket",
                inputs.output(storage::UNIT, "public_bucket")?.clone(),
            )
            .bind("redis_host", inputs.output(cache::UNIT, "endpoint")?.clone())
            .bind("hostname", Value::concrete(self.domain_name.as_str()))
            .bind("cdn_url", Value::concrete(self.domain_name.as_str()))
            .bind(
                "developer_emails",
                Value::concrete(self.developer_emails.as_str()),
            )
            .bind(
                "notification_email",
                Value::concrete(self.notification_email.as_str()),
            )
            .bind(
                "smtp_address",
                inputs.output(mail::UNIT, "smtp_address")?.clone(),
            )
            .bind("smtp_port", inputs.output(mail::UNIT, "smtp_port")?.clone())
            .bind(
                "smtp_user_name",
                inputs.output(mail::UNIT, "smtp_username")?.clone(),
            )
            .bind(
                "smtp_password",
                inputs.output(mail::UNIT, "smtp_password")?.clone(),
            )
            .bind("smtp_domain", inputs.output(mail::UNIT, "smtp_domain")?.clone())
            .bind(
                "oidc_client_id",
                inputs.output(identity::UNIT, "client_id")?.clone(),
            )
            .bind(
                "oidc_client_secret",
                inputs.output(identity::UNIT, "client_secret")?.clone(),
            )
            .bind(
                "oidc_discovery_document",
                inputs.output(identity::UNIT, "discovery_document")?.clone(),
            );

        for (placeholder, field) in [
            ("db_username", "username"),
            ("db_password", "password"),
            ("db_host", "host"),
            ("db_name", "dbname"),
            ("db_port", "port"),
        ] {
            binding.insert(placeholder, secret_field(region, database_secret, field));
        }
        for (placeholder, field) in [
            ("docker_user", "DOCKER_USER"),
            ("docker_password", "DOCKER_PASSWORD"),
            ("admin_username", "DISCOURSE_ADMIN_USERNAME"),
            ("admin_email", "DISCOURSE_ADMIN_EMAIL"),
            ("admin_password", "DISCOURSE_ADMIN_PASSWORD"),
        ] {
            binding.insert(placeholder, secret_field(region, &settings, field));
        }
        Ok(binding)
    }
}

/// Returns the factory of the bootstrap unit.
///
/// The unit's `user_data` output is the rendered script; it depends on every
/// unit whose deferred output the script embeds.
#[must_use]
pub fn factory(config: &StackConfig) -> UnitFactory {
    let settings = Settings::from_config(config);
    UnitFactory::new(UNIT, move |inputs| {
        let template = bootstrap_template()?;
        let binding = settings.binding(inputs)?;
        let user_data = render(&template, &binding)?;
        let digest = Sha256Digest::of(&user_data);
        tracing::debug!(
            bytes = user_data.len(),
            deferred_sources = binding.deferred_sources().len(),
            %digest,
            "rendered bootstrap script"
        );

        ProvisioningUnit::builder(UNIT)
            .consumes_all(binding.values())
            .output("user_data", Value::concrete(user_data))
            .output("user_data_digest", Value::concrete(digest.to_string()))
            .build()
    })
    .needs(storage::UNIT)
    .needs(database::UNIT)
    .needs(cache::UNIT)
    .needs(mail::UNIT)
    .needs(identity::UNIT)
}
