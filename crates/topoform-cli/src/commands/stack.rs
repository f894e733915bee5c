//! Stack configuration options shared by every subcommand.

use std::path::PathBuf;

use clap::Args;
use topoform_common::config::StackConfig;

/// Stack configuration. Explicit flags (or their environment variables)
/// override values loaded from `--config`.
#[derive(Args, Debug, Default)]
pub struct StackArgs {
    /// JSON file holding a stack configuration.
    #[arg(long, global = true, env = "TOPOFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stack identifier.
    #[arg(long, global = true, env = "TOPOFORM_STACK_ID")]
    pub stack_id: Option<String>,

    /// Target region.
    #[arg(long, global = true, env = "TOPOFORM_REGION")]
    pub region: Option<String>,

    /// Public hosted zone identifier.
    #[arg(long, global = true, env = "TOPOFORM_HOSTED_ZONE_ID")]
    pub hosted_zone_id: Option<String>,

    /// Public hosted zone name.
    #[arg(long, global = true, env = "TOPOFORM_HOSTED_ZONE_NAME")]
    pub hosted_zone_name: Option<String>,

    /// Public domain name of the application.
    #[arg(long, global = true, env = "TOPOFORM_DOMAIN_NAME")]
    pub domain_name: Option<String>,

    /// Domain verified for outbound mail.
    #[arg(long, global = true, env = "TOPOFORM_SES_SMTP_DOMAIN_NAME")]
    pub ses_smtp_domain_name: Option<String>,

    /// Sender address for notification mail.
    #[arg(long, global = true, env = "TOPOFORM_NOTIFICATION_EMAIL")]
    pub notification_email: Option<String>,

    /// Comma-separated administrator addresses.
    #[arg(long, global = true, env = "TOPOFORM_DEVELOPER_EMAILS")]
    pub developer_emails: Option<String>,

    /// Prefix of the hosted sign-in domain.
    #[arg(long, global = true, env = "TOPOFORM_AUTH_SUB_DOMAIN_NAME")]
    pub auth_sub_domain_name: Option<String>,

    /// ARN of the secret holding application settings.
    #[arg(long, global = true, env = "TOPOFORM_SETTINGS_SECRET_ARN")]
    pub settings_secret_arn: Option<String>,

    /// CIDR block of the application network.
    #[arg(long, global = true, env = "TOPOFORM_CIDR")]
    pub cidr: Option<String>,

    /// Header the CDN adds to origin requests.
    #[arg(long, global = true, env = "TOPOFORM_ALB_HEADER_CHECK_HEADER")]
    pub alb_header_check_header: Option<String>,

    /// Value of the origin check header.
    #[arg(long, global = true, env = "TOPOFORM_ALB_HEADER_CHECK_VALUE")]
    pub alb_header_check_value: Option<String>,
}

impl StackArgs {
    /// Builds the effective stack configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the `--config` file cannot be read or parsed.
    pub fn resolve(&self) -> anyhow::Result<StackConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading stack configuration");
                StackConfig::load(path)?
            }
            None => StackConfig::default(),
        };

        let overrides = [
            (&self.stack_id, &mut config.stack_id),
            (&self.region, &mut config.region),
            (&self.hosted_zone_id, &mut config.hosted_zone_id),
            (&self.hosted_zone_name, &mut config.hosted_zone_name),
            (&self.domain_name, &mut config.domain_name),
            (&self.ses_smtp_domain_name, &mut config.ses_smtp_domain_name),
            (&self.notification_email, &mut config.notification_email),
            (&self.developer_emails, &mut config.developer_emails),
            (&self.auth_sub_domain_name, &mut config.auth_sub_domain_name),
            (&self.settings_secret_arn, &mut config.settings_secret_arn),
            (&self.cidr, &mut config.cidr),
            (&self.alb_header_check_header, &mut config.alb_header_check_header),
            (&self.alb_header_check_value, &mut config.alb_header_check_value),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                field.clone_from(value);
            }
        }
        Ok(config)
    }
}
