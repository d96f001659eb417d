//! iOS builder.

use crate::job::{IosJob, IosJobKind, IosSecrets, Job};
use crate::{Builder, BuilderContext};
use async_trait::async_trait;
use shipyard_config::IosPreset;
use shipyard_core::{IosCredentials, Platform, Result};
use shipyard_credentials::{CredentialsProvider, IosCredentialsProvider, reconcile};
use tracing::info;

pub struct IosBuilder {
    ctx: BuilderContext,
    preset: IosPreset,
    credentials: Option<IosCredentials>,
}

impl IosBuilder {
    pub fn new(ctx: BuilderContext, preset: IosPreset) -> Self {
        Self {
            ctx,
            preset,
            credentials: None,
        }
    }

    pub fn credentials(&self) -> Option<&IosCredentials> {
        self.credentials.as_ref()
    }
}

#[async_trait]
impl Builder for IosBuilder {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn ensure_credentials(&mut self) -> Result<()> {
        if !self.preset.needs_credentials() {
            info!(platform = %Platform::Ios, "Build does not need signing credentials");
            return Ok(());
        }

        let mut provider = IosCredentialsProvider::new(&self.ctx.project, self.ctx.store.clone())?;
        reconcile::ensure_credentials(
            &mut provider,
            self.ctx.credentials_source,
            self.preset.workflow(),
            self.ctx.prompter.as_ref(),
        )
        .await?;

        if provider.is_committed() {
            self.credentials = Some(provider.credentials()?.clone());
        }
        Ok(())
    }

    fn prepare_job(&self, archive_url: &str) -> Job {
        let kind = match &self.preset {
            IosPreset::Generic(_) => IosJobKind::Generic,
            IosPreset::Managed(preset) => IosJobKind::Managed {
                build_type: preset.build_type,
            },
        };

        Job::Ios(IosJob {
            project_url: archive_url.to_string(),
            kind,
            secrets: self.credentials.as_ref().map(IosSecrets::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use shipyard_config::{IosBuildType, IosGenericPreset, IosManagedPreset};
    use shipyard_core::{
        CredentialsSource, DistributionCertificate, Error, ProjectContext, ProvisioningProfile,
    };
    use shipyard_credentials::{MemoryCredentialStore, NonInteractivePrompter};
    use std::sync::Arc;
    use tempfile::TempDir;

    const ARCHIVE: &str = "https://uploads.example.com/rocket.tar.gz";
    const BUNDLE: &str = "com.acme.rocket";

    fn context(
        project: ProjectContext,
        source: CredentialsSource,
        store: MemoryCredentialStore,
    ) -> BuilderContext {
        BuilderContext {
            project,
            credentials_source: source,
            store: Arc::new(store),
            prompter: Arc::new(NonInteractivePrompter::new()),
        }
    }

    fn project(dir: &TempDir) -> ProjectContext {
        ProjectContext::new(dir.path(), "acme", "rocket").with_bundle_identifier(BUNDLE)
    }

    fn write_local(dir: &TempDir) {
        std::fs::write(dir.path().join("dist.p12"), b"cert").unwrap();
        std::fs::write(dir.path().join("app.mobileprovision"), b"profile").unwrap();
        let credentials = json!({
            "ios": {
                "provisioningProfilePath": "app.mobileprovision",
                "distributionCertificate": { "path": "dist.p12", "password": "certpass" }
            }
        });
        std::fs::write(dir.path().join("credentials.json"), credentials.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_missing_bundle_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectContext::new(dir.path(), "acme", "rocket");

        let mut builder = IosBuilder::new(
            context(project, CredentialsSource::Local, MemoryCredentialStore::new()),
            IosPreset::Generic(IosGenericPreset {}),
        );
        let err = builder.ensure_credentials().await.unwrap_err();

        assert!(matches!(err, Error::MissingBundleIdentifier));
    }

    #[tokio::test]
    async fn test_simulator_build_skips_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectContext::new(dir.path(), "acme", "rocket");
        let preset = IosPreset::Managed(IosManagedPreset {
            build_type: Some(IosBuildType::Simulator),
        });

        let mut builder = IosBuilder::new(
            context(
                project,
                CredentialsSource::Auto,
                MemoryCredentialStore::new().failing("unused"),
            ),
            preset,
        );
        builder.ensure_credentials().await.unwrap();

        assert_eq!(
            serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap(),
            json!({
                "platform": "ios",
                "projectUrl": ARCHIVE,
                "type": "managed",
                "buildType": "simulator"
            })
        );
    }

    #[tokio::test]
    async fn test_local_source_injects_local_secrets() {
        let dir = tempfile::tempdir().unwrap();
        write_local(&dir);
        let preset = IosPreset::Managed(IosManagedPreset {
            build_type: Some(IosBuildType::Archive),
        });

        let mut builder = IosBuilder::new(
            context(project(&dir), CredentialsSource::Local, MemoryCredentialStore::new()),
            preset,
        );
        builder.ensure_credentials().await.unwrap();

        let job = serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap();
        assert_eq!(
            job["secrets"],
            json!({
                "provisioningProfileBase64": STANDARD.encode(b"profile"),
                "distributionCertificate": {
                    "dataBase64": STANDARD.encode(b"cert"),
                    "password": "certpass"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_remote_setup_generates_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new().generating_ios(
            DistributionCertificate {
                cert_p12: STANDARD.encode(b"generated-cert"),
                cert_password: "generated".to_string(),
            },
            ProvisioningProfile {
                provisioning_profile: STANDARD.encode(b"generated-profile"),
            },
        );

        let mut builder = IosBuilder::new(
            context(project(&dir), CredentialsSource::Remote, store),
            IosPreset::Generic(IosGenericPreset {}),
        );
        builder.ensure_credentials().await.unwrap();

        let job = serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap();
        assert_eq!(job["type"], "generic");
        assert_eq!(
            job["secrets"]["provisioningProfileBase64"],
            STANDARD.encode(b"generated-profile")
        );
        assert_eq!(job["secrets"]["distributionCertificate"]["password"], "generated");
    }
}
