//! Android builder.

use crate::job::{AndroidJob, AndroidJobKind, AndroidSecrets, Job};
use crate::{Builder, BuilderContext};
use async_trait::async_trait;
use shipyard_config::AndroidPreset;
use shipyard_core::{AndroidCredentials, Platform, Result};
use shipyard_credentials::{AndroidCredentialsProvider, CredentialsProvider, reconcile};
use tracing::info;

pub struct AndroidBuilder {
    ctx: BuilderContext,
    preset: AndroidPreset,
    credentials: Option<AndroidCredentials>,
}

impl AndroidBuilder {
    pub fn new(ctx: BuilderContext, preset: AndroidPreset) -> Self {
        Self {
            ctx,
            preset,
            credentials: None,
        }
    }

    /// Credentials to inject into the job, once resolved.
    pub fn credentials(&self) -> Option<&AndroidCredentials> {
        self.credentials.as_ref()
    }
}

#[async_trait]
impl Builder for AndroidBuilder {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn ensure_credentials(&mut self) -> Result<()> {
        if !self.preset.needs_credentials() {
            info!(platform = %Platform::Android, "Build does not need signing credentials");
            return Ok(());
        }

        let mut provider =
            AndroidCredentialsProvider::new(&self.ctx.project, self.ctx.store.clone());
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
            AndroidPreset::Generic(preset) => AndroidJobKind::Generic {
                gradle_command: preset.build_command.clone(),
                artifact_path: preset.artifact_path.clone(),
            },
            AndroidPreset::Managed(preset) => AndroidJobKind::Managed {
                build_type: preset.build_type,
            },
        };

        Job::Android(AndroidJob {
            project_url: archive_url.to_string(),
            kind,
            secrets: self.credentials.as_ref().map(AndroidSecrets::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use shipyard_config::{AndroidBuildType, AndroidGenericPreset, AndroidManagedPreset};
    use shipyard_core::{CredentialsSource, Error, Keystore, ProjectContext};
    use shipyard_credentials::{MemoryCredentialStore, NonInteractivePrompter};
    use std::sync::Arc;
    use tempfile::TempDir;

    const ARCHIVE: &str = "https://uploads.example.com/rocket.tar.gz";

    fn keystore(bytes: &[u8]) -> Keystore {
        Keystore {
            keystore: STANDARD.encode(bytes),
            keystore_password: "storepass".to_string(),
            key_alias: "upload".to_string(),
            key_password: "keypass".to_string(),
        }
    }

    fn write_local(dir: &TempDir, bytes: &[u8]) {
        std::fs::write(dir.path().join("release.jks"), bytes).unwrap();
        let credentials = json!({
            "android": {
                "keystore": {
                    "keystorePath": "release.jks",
                    "keystorePassword": "storepass",
                    "keyAlias": "upload",
                    "keyPassword": "keypass"
                }
            }
        });
        std::fs::write(dir.path().join("credentials.json"), credentials.to_string()).unwrap();
    }

    fn context(
        dir: &TempDir,
        source: CredentialsSource,
        store: MemoryCredentialStore,
    ) -> BuilderContext {
        BuilderContext {
            project: ProjectContext::new(dir.path(), "acme", "rocket"),
            credentials_source: source,
            store: Arc::new(store),
            prompter: Arc::new(NonInteractivePrompter::new()),
        }
    }

    #[tokio::test]
    async fn test_without_credentials_never_touches_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new().failing("store should not be called");
        let preset = AndroidPreset::Generic(AndroidGenericPreset {
            build_command: Some(":app:assembleDebug".to_string()),
            artifact_path: None,
            without_credentials: Some(true),
        });

        let ctx = context(&dir, CredentialsSource::Auto, store);
        let mut builder = AndroidBuilder::new(ctx, preset);
        builder.ensure_credentials().await.unwrap();

        assert!(builder.credentials().is_none());
        assert_eq!(
            serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap(),
            json!({
                "platform": "android",
                "projectUrl": ARCHIVE,
                "type": "generic",
                "gradleCommand": ":app:assembleDebug"
            })
        );
    }

    #[tokio::test]
    async fn test_generic_uses_remote_when_only_remote_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new()
            .with_android_keystore("@acme/rocket", keystore(b"remote"));

        let mut builder = AndroidBuilder::new(
            context(&dir, CredentialsSource::Auto, store),
            AndroidPreset::Generic(AndroidGenericPreset::default()),
        );
        builder.ensure_credentials().await.unwrap();

        let job = serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap();
        assert_eq!(
            job["secrets"],
            json!({
                "keystore": {
                    "dataBase64": STANDARD.encode(b"remote"),
                    "keystorePassword": "storepass",
                    "keyAlias": "upload",
                    "keyPassword": "keypass"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_synced_credentials_leave_job_without_secrets() {
        let dir = tempfile::tempdir().unwrap();
        write_local(&dir, b"same");
        let store = MemoryCredentialStore::new()
            .with_android_keystore("@acme/rocket", keystore(b"same"));

        let mut builder = AndroidBuilder::new(
            context(&dir, CredentialsSource::Auto, store),
            AndroidPreset::Generic(AndroidGenericPreset::default()),
        );
        builder.ensure_credentials().await.unwrap();

        assert!(builder.credentials().is_none());
        assert!(
            serde_json::to_value(builder.prepare_job(ARCHIVE))
                .unwrap()
                .get("secrets")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_managed_prefers_local_file() {
        let dir = tempfile::tempdir().unwrap();
        write_local(&dir, b"local");
        let store = MemoryCredentialStore::new()
            .with_android_keystore("@acme/rocket", keystore(b"remote"));
        let preset = AndroidPreset::Managed(AndroidManagedPreset {
            build_type: Some(AndroidBuildType::AppBundle),
        });

        let ctx = context(&dir, CredentialsSource::Auto, store);
        let mut builder = AndroidBuilder::new(ctx, preset);
        builder.ensure_credentials().await.unwrap();

        let job = serde_json::to_value(builder.prepare_job(ARCHIVE)).unwrap();
        assert_eq!(job["type"], "managed");
        assert_eq!(job["buildType"], "app-bundle");
        assert_eq!(job["secrets"]["keystore"]["dataBase64"], STANDARD.encode(b"local"));
    }

    #[tokio::test]
    async fn test_unconfigured_generic_fails_without_prompting() {
        let dir = tempfile::tempdir().unwrap();

        let mut builder = AndroidBuilder::new(
            context(&dir, CredentialsSource::Auto, MemoryCredentialStore::new()),
            AndroidPreset::Generic(AndroidGenericPreset::default()),
        );
        let err = builder.ensure_credentials().await.unwrap_err();

        assert!(matches!(err, Error::Prompt(_)));
    }
}
