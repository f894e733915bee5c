//! Stack configuration model.
//!
//! The scalar inputs of a deployment (domain names, CIDR block, e-mail
//! addresses, secret identifiers) arrive as plain strings. The composition
//! engine treats them as opaque concrete values; the only validation is the
//! presence check a unit performs through [`require`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, TopoformError};

/// Root configuration for one deployment of the web application stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Stack identifier, used as a prefix for platform resource names.
    pub stack_id: String,
    /// Target region, e.g. `us-east-1`.
    pub region: String,
    /// Identifier of the public hosted zone.
    pub hosted_zone_id: String,
    /// Name of the public hosted zone, e.g. `example.com`.
    pub hosted_zone_name: String,
    /// Public domain name of the application.
    pub domain_name: String,
    /// Domain verified for outbound mail.
    pub ses_smtp_domain_name: String,
    /// Sender address for notification mail.
    pub notification_email: String,
    /// Comma-separated list of administrator addresses.
    pub developer_emails: String,
    /// Prefix of the hosted sign-in domain of the identity provider.
    pub auth_sub_domain_name: String,
    /// ARN of the secret holding application settings.
    pub settings_secret_arn: String,
    /// CIDR block of the application network.
    pub cidr: String,
    /// Header the CDN adds to origin requests.
    pub alb_header_check_header: String,
    /// Value of the origin check header.
    pub alb_header_check_value: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_id: constants::DEFAULT_STACK_ID.to_owned(),
            region: String::new(),
            hosted_zone_id: String::new(),
            hosted_zone_name: String::new(),
            domain_name: String::new(),
            ses_smtp_domain_name: String::new(),
            notification_email: String::new(),
            developer_emails: String::new(),
            auth_sub_domain_name: String::new(),
            settings_secret_arn: String::new(),
            cidr: constants::DEFAULT_CIDR.to_owned(),
            alb_header_check_header: constants::DEFAULT_ALB_HEADER_CHECK_HEADER.to_owned(),
            alb_header_check_value: constants::DEFAULT_ALB_HEADER_CHECK_VALUE.to_owned(),
        }
    }
}

impl StackConfig {
    /// Loads a configuration from a JSON file. Missing keys take their
    /// default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TopoformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Checks that a configuration value is present (non-blank).
///
/// # Errors
///
/// Returns [`TopoformError::Config`] naming `field` if `value` is empty or
/// only whitespace.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(TopoformError::Config {
            message: format!("{field} must not be empty"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_fill_network_and_header_check() {
        let config = StackConfig::default();
        assert_eq!(config.cidr, "10.0.0.0/16");
        assert_eq!(config.alb_header_check_header, "X-Discourse-ALB-Check");
        assert!(config.domain_name.is_empty());
    }

    #[test]
    fn load_merges_partial_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"region": "eu-west-1", "domain_name": "forum.example.com"}}"#
        )
        .expect("write");

        let config = StackConfig::load(file.path()).expect("should load");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.domain_name, "forum.example.com");
        assert_eq!(config.cidr, constants::DEFAULT_CIDR);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StackConfig::load(Path::new("/nonexistent/stack.json")).unwrap_err();
        assert!(matches!(err, TopoformError::Io { .. }), "got: {err}");
    }

    #[test]
    fn require_rejects_blank_values() {
        let err = require("domain name", "  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: domain name must not be empty"
        );
    }

    #[test]
    fn require_passes_value_through() {
        assert_eq!(require("region", "us-east-1").expect("present"), "us-east-1");
    }
}
