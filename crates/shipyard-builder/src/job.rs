//! Build job descriptions.

use serde::Serialize;
use shipyard_config::{AndroidBuildType, IosBuildType};
use shipyard_core::{AndroidCredentials, IosCredentials};

/// A build job ready to hand to the build service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum Job {
    Android(AndroidJob),
    Ios(IosJob),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidJob {
    /// Where the build service downloads the project archive.
    pub project_url: String,
    #[serde(flatten)]
    pub kind: AndroidJobKind,
    /// Absent when the service should use the credentials it already stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<AndroidSecrets>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AndroidJobKind {
    Generic {
        #[serde(skip_serializing_if = "Option::is_none")]
        gradle_command: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        artifact_path: Option<String>,
    },
    Managed {
        #[serde(skip_serializing_if = "Option::is_none")]
        build_type: Option<AndroidBuildType>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidSecrets {
    pub keystore: KeystoreSecret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystoreSecret {
    pub data_base64: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

impl From<&AndroidCredentials> for AndroidSecrets {
    fn from(credentials: &AndroidCredentials) -> Self {
        let keystore = &credentials.keystore;
        Self {
            keystore: KeystoreSecret {
                data_base64: keystore.keystore.clone(),
                keystore_password: keystore.keystore_password.clone(),
                key_alias: keystore.key_alias.clone(),
                key_password: keystore.key_password.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IosJob {
    pub project_url: String,
    #[serde(flatten)]
    pub kind: IosJobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<IosSecrets>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum IosJobKind {
    Generic,
    Managed {
        #[serde(skip_serializing_if = "Option::is_none")]
        build_type: Option<IosBuildType>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IosSecrets {
    pub provisioning_profile_base64: String,
    pub distribution_certificate: CertificateSecret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSecret {
    pub data_base64: String,
    pub password: String,
}

impl From<&IosCredentials> for IosSecrets {
    fn from(credentials: &IosCredentials) -> Self {
        Self {
            provisioning_profile_base64: credentials.provisioning_profile.clone(),
            distribution_certificate: CertificateSecret {
                data_base64: credentials.distribution_certificate.cert_p12.clone(),
                password: credentials.distribution_certificate.cert_password.clone(),
            },
        }
    }
}
