//! Signing credential bundles.
//!
//! Binary material (keystores, certificates, provisioning profiles) is carried
//! base64-encoded. A bundle only counts as present when every field is
//! non-empty; partially populated bundles are treated as absent.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where signing credentials for a build should come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsSource {
    /// The project's credentials.json.
    #[display("local")]
    Local,
    /// The account-scoped remote store.
    #[display("remote")]
    Remote,
    /// Decided per build by the reconciliation policy.
    #[default]
    #[display("auto")]
    Auto,
}

impl FromStr for CredentialsSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(CredentialsSource::Local),
            "remote" => Ok(CredentialsSource::Remote),
            "auto" => Ok(CredentialsSource::Auto),
            other => Err(format!(
                "unknown credentials source '{}', expected local, remote or auto",
                other
            )),
        }
    }
}

/// Android upload keystore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    /// Keystore file contents, base64.
    pub keystore: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

impl Keystore {
    pub fn is_complete(&self) -> bool {
        !self.keystore.is_empty()
            && !self.keystore_password.is_empty()
            && !self.key_alias.is_empty()
            && !self.key_password.is_empty()
    }
}

/// iOS distribution certificate as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCertificate {
    /// PKCS#12 archive, base64.
    pub cert_p12: String,
    pub cert_password: String,
}

/// iOS provisioning profile as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningProfile {
    /// Profile contents, base64.
    pub provisioning_profile: String,
}

/// Everything needed to sign an Android build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidCredentials {
    pub keystore: Keystore,
}

impl AndroidCredentials {
    pub fn is_complete(&self) -> bool {
        self.keystore.is_complete()
    }
}

/// Everything needed to sign an iOS build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosCredentials {
    /// Provisioning profile contents, base64.
    pub provisioning_profile: String,
    pub distribution_certificate: DistributionCertificate,
}

impl IosCredentials {
    pub fn new(certificate: DistributionCertificate, profile: ProvisioningProfile) -> Self {
        Self {
            provisioning_profile: profile.provisioning_profile,
            distribution_certificate: certificate,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.provisioning_profile.is_empty()
            && !self.distribution_certificate.cert_p12.is_empty()
            && !self.distribution_certificate.cert_password.is_empty()
    }
}
