//! HTTP client for the build service's credential store.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shipyard_core::{
    DistributionCertificate, Error, Keystore, ProvisioningProfile, RemoteCredentialStore, Result,
};
use tracing::debug;

/// Remote credential store backed by the build service API.
pub struct HttpCredentialStore {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvisioningProfileSetup<'a> {
    distribution_certificate: &'a DistributionCertificate,
}

impl HttpCredentialStore {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn project_url(&self, full_name: &str, path: &str) -> String {
        format!(
            "{}/projects/{}/credentials/{}",
            self.api_url,
            urlencoding::encode(full_name),
            path
        )
    }

    fn ios_path(bundle_identifier: &str, resource: &str) -> String {
        format!("ios/{}/{}", urlencoding::encode(bundle_identifier), resource)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// GET a resource; 404 means nothing is stored.
    async fn get_optional<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!(%url, "Fetching remote credentials");
        let response = self
            .authorize(self.client.get(url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Remote(format!("{} returned {}: {}", url, status, text)));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| Error::Remote(format!("invalid response from {}: {}", url, e)))
    }

    async fn post_setup<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<()> {
        debug!(%url, "Running remote credentials setup");
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::RemoteSetupFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::RemoteSetupFailed(format!(
                "{} returned {}: {}",
                url, status, text
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCredentialStore for HttpCredentialStore {
    async fn fetch_android_keystore(&self, full_name: &str) -> Result<Option<Keystore>> {
        self.get_optional(&self.project_url(full_name, "android/keystore"))
            .await
    }

    async fn fetch_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<DistributionCertificate>> {
        let path = Self::ios_path(bundle_identifier, "distribution-certificate");
        self.get_optional(&self.project_url(full_name, &path)).await
    }

    async fn fetch_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<ProvisioningProfile>> {
        let path = Self::ios_path(bundle_identifier, "provisioning-profile");
        self.get_optional(&self.project_url(full_name, &path)).await
    }

    async fn setup_android_keystore(&self, full_name: &str) -> Result<()> {
        self.post_setup(
            &self.project_url(full_name, "android/keystore/setup"),
            &serde_json::json!({}),
        )
        .await
    }

    async fn setup_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<()> {
        let path = Self::ios_path(bundle_identifier, "distribution-certificate/setup");
        self.post_setup(&self.project_url(full_name, &path), &serde_json::json!({}))
            .await
    }

    async fn setup_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
        certificate: &DistributionCertificate,
    ) -> Result<()> {
        let path = Self::ios_path(bundle_identifier, "provisioning-profile/setup");
        let body = ProvisioningProfileSetup {
            distribution_certificate: certificate,
        };
        self.post_setup(&self.project_url(full_name, &path), &body)
            .await
    }
}
