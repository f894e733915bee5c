//! System-wide constants and defaults.

/// Default stack identifier, used as a prefix for platform resource names.
pub const DEFAULT_STACK_ID: &str = "Forum";

/// Default CIDR block for the application network.
pub const DEFAULT_CIDR: &str = "10.0.0.0/16";

/// Default header the CDN injects so the load balancer can reject direct traffic.
pub const DEFAULT_ALB_HEADER_CHECK_HEADER: &str = "X-Discourse-ALB-Check";

/// Default value of the CDN origin check header.
pub const DEFAULT_ALB_HEADER_CHECK_VALUE: &str = "c9fd4d17-24a6-463f-b470-1c4347253245";

/// Port the application listens on behind the load balancer.
pub const APP_PORT: u16 = 80;

/// Port of the managed PostgreSQL cluster.
pub const DATABASE_PORT: u16 = 5432;

/// Port of the managed Redis replication group.
pub const CACHE_PORT: u16 = 6379;

/// Port of the SES SMTP submission endpoint.
pub const SMTP_PORT: u16 = 587;

/// Port of the public HTTPS listener.
pub const HTTPS_PORT: u16 = 443;

/// Name of the application database and of its generated admin user.
pub const DATABASE_NAME: &str = "discourse";
