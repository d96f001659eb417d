//! Project-local credentials.json.
//!
//! The file is re-read and re-validated on every call. Secret files it
//! references are resolved against the project directory and returned
//! base64-encoded; a referenced file that cannot be read is an error, not
//! "no local credentials".

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::error::Category;
use shipyard_core::{
    AndroidCredentials, DistributionCertificate, Error, IosCredentials, Keystore, Result,
};
use std::path::{Path, PathBuf};

/// Name of the local secrets file in the project root.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

#[derive(Debug, Deserialize)]
struct CredentialsJson {
    android: Option<AndroidSection>,
    ios: Option<IosSection>,
}

#[derive(Debug, Deserialize)]
struct AndroidSection {
    keystore: KeystoreInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeystoreInfo {
    keystore_path: String,
    keystore_password: String,
    key_alias: String,
    key_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IosSection {
    provisioning_profile_path: String,
    distribution_certificate: CertificateInfo,
}

#[derive(Debug, Deserialize)]
struct CertificateInfo {
    path: String,
    password: String,
}

pub fn credentials_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CREDENTIALS_FILE_NAME)
}

/// Whether credentials.json exists. Absence is normal and never an error.
pub async fn exists(project_dir: &Path) -> bool {
    tokio::fs::try_exists(credentials_path(project_dir))
        .await
        .unwrap_or(false)
}

/// Read Android signing material from credentials.json.
pub async fn read_android(project_dir: &Path) -> Result<AndroidCredentials> {
    let android = read(project_dir).await?.android.ok_or_else(|| {
        Error::LocalCredentials(format!(
            "Android credentials are missing from {}",
            CREDENTIALS_FILE_NAME
        ))
    })?;
    let info = android.keystore;

    Ok(AndroidCredentials {
        keystore: Keystore {
            keystore: read_base64(project_dir, &info.keystore_path).await?,
            keystore_password: info.keystore_password,
            key_alias: info.key_alias,
            key_password: info.key_password,
        },
    })
}

/// Read iOS signing material from credentials.json.
pub async fn read_ios(project_dir: &Path) -> Result<IosCredentials> {
    let ios = read(project_dir).await?.ios.ok_or_else(|| {
        Error::LocalCredentials(format!(
            "iOS credentials are missing from {}",
            CREDENTIALS_FILE_NAME
        ))
    })?;

    Ok(IosCredentials {
        provisioning_profile: read_base64(project_dir, &ios.provisioning_profile_path).await?,
        distribution_certificate: DistributionCertificate {
            cert_p12: read_base64(project_dir, &ios.distribution_certificate.path).await?,
            cert_password: ios.distribution_certificate.password,
        },
    })
}

async fn read(project_dir: &Path) -> Result<CredentialsJson> {
    let path = credentials_path(project_dir);
    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
        Error::LocalCredentials(format!(
            "{} must exist in the project root directory and contain valid JSON ({})",
            CREDENTIALS_FILE_NAME, e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| invalid_file(&e))
}

/// Describe a parse failure by category and position only. serde_json's own
/// message quotes the offending value, which may be a password.
fn invalid_file(e: &serde_json::Error) -> Error {
    let problem = match e.classify() {
        Category::Io => "unreadable content",
        Category::Syntax => "malformed JSON",
        Category::Data => "missing field or value of the wrong type",
        Category::Eof => "unexpected end of file",
    };
    Error::LocalCredentials(format!(
        "{} is not valid [{} at line {} column {}]",
        CREDENTIALS_FILE_NAME,
        problem,
        e.line(),
        e.column()
    ))
}

async fn read_base64(project_dir: &Path, file: &str) -> Result<String> {
    let path = project_dir.join(file);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        Error::LocalCredentials(format!(
            "failed to read {} referenced in {}: {}",
            path.display(),
            CREDENTIALS_FILE_NAME,
            e
        ))
    })?;
    Ok(STANDARD.encode(bytes))
}
