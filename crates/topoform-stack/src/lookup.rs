//! Deferred expressions.
//!
//! Identifiers the platform assigns at creation time are written as backend
//! references `${unit.Attribute}` and substituted by the provisioning
//! backend. Values only the running instance can read (secret fields, the
//! identity client secret) are shell command substitutions evaluated on the
//! host, typically wrapping such a reference.

use topoform_compose::Value;

/// Returns a backend reference to an attribute of `unit`.
#[must_use]
pub fn platform_ref(unit: &str, attribute: &str) -> Value {
    Value::deferred(unit, format!("${{{unit}.{attribute}}}"))
}

/// Returns the shell command reading one JSON field of a stored secret.
#[must_use]
pub fn secret_lookup(region: &str, secret_id: &str, field: &str) -> String {
    format!(
        "$(aws secretsmanager get-secret-value --region {region} --secret-id {secret_id} \
         --query SecretString --output text | jq -r .{field})"
    )
}

/// Wraps `secret` into a host-side lookup of one of its fields.
///
/// The result stays deferred, and owned by the same unit, when the secret
/// identifier itself is deferred.
#[must_use]
pub fn secret_field(region: &str, secret: &Value, field: &str) -> Value {
    secret.derive(|secret_id| secret_lookup(region, secret_id, field))
}
