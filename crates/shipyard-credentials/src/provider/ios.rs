use async_trait::async_trait;
use futures::future;
use shipyard_core::{
    Error, IosCredentials, Platform, ProjectContext, RemoteCredentialStore, Result,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::CredentialsProvider;
use crate::local;

/// Provides the distribution certificate and provisioning profile for iOS builds.
pub struct IosCredentialsProvider {
    project_dir: PathBuf,
    full_name: String,
    bundle_identifier: String,
    store: Arc<dyn RemoteCredentialStore>,
    credentials: Option<IosCredentials>,
}

impl IosCredentialsProvider {
    /// Fails with [`Error::MissingBundleIdentifier`] if the project has none.
    pub fn new(project: &ProjectContext, store: Arc<dyn RemoteCredentialStore>) -> Result<Self> {
        let bundle_identifier = project
            .bundle_identifier
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(Error::MissingBundleIdentifier)?;

        Ok(Self {
            project_dir: project.project_dir.clone(),
            full_name: project.full_name(),
            bundle_identifier,
            store,
            credentials: None,
        })
    }

    /// Fetch the remote certificate and profile; either missing is an error.
    async fn fetch_remote(&self) -> Result<IosCredentials> {
        let certificate = self
            .store
            .fetch_ios_distribution_certificate(&self.full_name, &self.bundle_identifier)
            .await?
            .ok_or_else(|| Error::Remote("missing distribution certificate".to_string()))?;
        let profile = self
            .store
            .fetch_ios_provisioning_profile(&self.full_name, &self.bundle_identifier)
            .await?
            .ok_or_else(|| Error::Remote("missing provisioning profile".to_string()))?;

        Ok(IosCredentials::new(certificate, profile))
    }
}

#[async_trait]
impl CredentialsProvider for IosCredentialsProvider {
    type Credentials = IosCredentials;

    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn has_local(&self) -> bool {
        if !local::exists(&self.project_dir).await {
            return false;
        }
        match local::read_ios(&self.project_dir).await {
            Ok(credentials) => credentials.is_complete(),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable local iOS credentials");
                false
            }
        }
    }

    async fn has_remote(&self) -> Result<bool> {
        let (certificate, profile) = future::join(
            self.store
                .fetch_ios_distribution_certificate(&self.full_name, &self.bundle_identifier),
            self.store
                .fetch_ios_provisioning_profile(&self.full_name, &self.bundle_identifier),
        )
        .await;

        Ok(match (certificate?, profile?) {
            (Some(certificate), Some(profile)) => {
                IosCredentials::new(certificate, profile).is_complete()
            }
            _ => false,
        })
    }

    async fn use_local(&mut self) -> Result<()> {
        let credentials = local::read_ios(&self.project_dir).await?;
        if !credentials.is_complete() {
            return Err(Error::InvalidLocalCredentials(format!(
                "incomplete iOS credentials in {}",
                local::CREDENTIALS_FILE_NAME
            )));
        }
        info!(bundle_identifier = %self.bundle_identifier, "Using local iOS credentials");
        self.credentials = Some(credentials);
        Ok(())
    }

    async fn use_remote(&mut self) -> Result<()> {
        self.store
            .setup_ios_distribution_certificate(&self.full_name, &self.bundle_identifier)
            .await?;

        let certificate = self
            .store
            .fetch_ios_distribution_certificate(&self.full_name, &self.bundle_identifier)
            .await?
            .ok_or_else(|| {
                Error::RemoteSetupFailed("missing distribution certificate".to_string())
            })?;

        self.store
            .setup_ios_provisioning_profile(&self.full_name, &self.bundle_identifier, &certificate)
            .await?;

        let credentials = self
            .fetch_remote()
            .await
            .map_err(|e| Error::RemoteSetupFailed(e.to_string()))?;
        if !credentials.is_complete() {
            return Err(Error::RemoteSetupFailed(format!(
                "incomplete iOS credentials for {}",
                self.bundle_identifier
            )));
        }

        info!(bundle_identifier = %self.bundle_identifier, "Using remote iOS credentials");
        self.credentials = Some(credentials);
        Ok(())
    }

    async fn is_local_synced(&self) -> bool {
        let (remote, local) =
            future::join(self.fetch_remote(), local::read_ios(&self.project_dir)).await;

        match (remote, local) {
            (Ok(remote), Ok(local)) => remote == local && remote.is_complete(),
            _ => true,
        }
    }

    fn is_committed(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&IosCredentials> {
        self.credentials.as_ref().ok_or(Error::NoCredentialsCommitted)
    }
}
