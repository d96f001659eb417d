//! Remote credential store abstraction.

use async_trait::async_trait;

use crate::{DistributionCertificate, Keystore, ProvisioningProfile, Result};

/// Account-scoped credential storage on the build service.
///
/// Fetches return `Ok(None)` when nothing is stored. The `setup_*` methods
/// guarantee that material exists afterwards (creating or uploading it as
/// needed) or fail.
#[async_trait]
pub trait RemoteCredentialStore: Send + Sync {
    /// Get the Android keystore for a project.
    async fn fetch_android_keystore(&self, full_name: &str) -> Result<Option<Keystore>>;

    /// Get the iOS distribution certificate for a bundle identifier.
    async fn fetch_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<DistributionCertificate>>;

    /// Get the iOS provisioning profile for a bundle identifier.
    async fn fetch_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<ProvisioningProfile>>;

    /// Make sure an Android keystore exists.
    async fn setup_android_keystore(&self, full_name: &str) -> Result<()>;

    /// Make sure an iOS distribution certificate exists.
    async fn setup_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<()>;

    /// Make sure a provisioning profile signed by `certificate` exists.
    async fn setup_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
        certificate: &DistributionCertificate,
    ) -> Result<()>;
}
