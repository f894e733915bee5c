//! Object storage: a public bucket for uploads and assets served through
//! the CDN, and a private bucket for backups and instance bootstrap files.

use topoform_compose::{ProvisioningUnit, UnitFactory};

use crate::lookup::platform_ref;

/// Unit name.
pub const UNIT: &str = "storage";

/// Returns the factory of the storage unit.
#[must_use]
pub fn factory() -> UnitFactory {
    UnitFactory::new(UNIT, |_| {
        ProvisioningUnit::builder(UNIT)
            .output("public_bucket", platform_ref(UNIT, "PublicBucketName"))
            .output("public_bucket_arn", platform_ref(UNIT, "PublicBucketArn"))
            .output(
                "public_bucket_domain",
                platform_ref(UNIT, "PublicBucketRegionalDomainName"),
            )
            .output("backup_bucket", platform_ref(UNIT, "BackupBucketName"))
            .output("backup_bucket_arn", platform_ref(UNIT, "BackupBucketArn"))
            .build()
    })
}
