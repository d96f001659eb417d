use async_trait::async_trait;
use futures::future;
use shipyard_core::{
    AndroidCredentials, Error, Keystore, Platform, ProjectContext, RemoteCredentialStore, Result,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::CredentialsProvider;
use crate::local;

/// Provides the upload keystore for Android builds.
pub struct AndroidCredentialsProvider {
    project_dir: PathBuf,
    full_name: String,
    store: Arc<dyn RemoteCredentialStore>,
    credentials: Option<AndroidCredentials>,
}

impl AndroidCredentialsProvider {
    pub fn new(project: &ProjectContext, store: Arc<dyn RemoteCredentialStore>) -> Self {
        Self {
            project_dir: project.project_dir.clone(),
            full_name: project.full_name(),
            store,
            credentials: None,
        }
    }

    async fn fetch_remote(&self) -> Result<Option<Keystore>> {
        self.store.fetch_android_keystore(&self.full_name).await
    }
}

#[async_trait]
impl CredentialsProvider for AndroidCredentialsProvider {
    type Credentials = AndroidCredentials;

    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn has_local(&self) -> bool {
        if !local::exists(&self.project_dir).await {
            return false;
        }
        match local::read_android(&self.project_dir).await {
            Ok(credentials) => credentials.is_complete(),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable local Android credentials");
                false
            }
        }
    }

    async fn has_remote(&self) -> Result<bool> {
        Ok(self
            .fetch_remote()
            .await?
            .is_some_and(|keystore| keystore.is_complete()))
    }

    async fn use_local(&mut self) -> Result<()> {
        let credentials = local::read_android(&self.project_dir).await?;
        if !credentials.is_complete() {
            return Err(Error::InvalidLocalCredentials(format!(
                "invalid keystore in {}",
                local::CREDENTIALS_FILE_NAME
            )));
        }
        info!(project = %self.full_name, "Using local Android keystore");
        self.credentials = Some(credentials);
        Ok(())
    }

    async fn use_remote(&mut self) -> Result<()> {
        self.store.setup_android_keystore(&self.full_name).await?;

        let keystore = self
            .fetch_remote()
            .await?
            .filter(Keystore::is_complete)
            .ok_or_else(|| {
                Error::RemoteSetupFailed(format!("no valid keystore for {}", self.full_name))
            })?;

        info!(project = %self.full_name, "Using remote Android keystore");
        self.credentials = Some(AndroidCredentials { keystore });
        Ok(())
    }

    async fn is_local_synced(&self) -> bool {
        let (remote, local) = future::join(
            self.fetch_remote(),
            local::read_android(&self.project_dir),
        )
        .await;

        match (remote, local) {
            (Ok(Some(remote)), Ok(local)) => remote == local.keystore && remote.is_complete(),
            _ => true,
        }
    }

    fn is_committed(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&AndroidCredentials> {
        self.credentials.as_ref().ok_or(Error::NoCredentialsCommitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCredentialStore;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;
    use tempfile::TempDir;

    const FULL_NAME: &str = "@acme/rocket";

    fn keystore(bytes: &[u8], password: &str) -> Keystore {
        Keystore {
            keystore: STANDARD.encode(bytes),
            keystore_password: password.to_string(),
            key_alias: "upload".to_string(),
            key_password: "keypass".to_string(),
        }
    }

    fn project_with_local(bytes: &[u8], password: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("release.jks"), bytes).unwrap();
        let credentials = json!({
            "android": {
                "keystore": {
                    "keystorePath": "release.jks",
                    "keystorePassword": password,
                    "keyAlias": "upload",
                    "keyPassword": "keypass"
                }
            }
        });
        std::fs::write(local::credentials_path(dir.path()), credentials.to_string()).unwrap();
        dir
    }

    fn provider(dir: &TempDir, store: MemoryCredentialStore) -> AndroidCredentialsProvider {
        let project = ProjectContext::new(dir.path(), "acme", "rocket");
        AndroidCredentialsProvider::new(&project, Arc::new(store))
    }

    #[tokio::test]
    async fn test_has_local() {
        let empty = tempfile::tempdir().unwrap();
        assert!(!provider(&empty, MemoryCredentialStore::new()).has_local().await);

        let dir = project_with_local(b"jks", "storepass");
        assert!(provider(&dir, MemoryCredentialStore::new()).has_local().await);

        let blank_password = project_with_local(b"jks", "");
        assert!(
            !provider(&blank_password, MemoryCredentialStore::new())
                .has_local()
                .await
        );
    }

    #[tokio::test]
    async fn test_has_local_swallows_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(local::credentials_path(dir.path()), "not json").unwrap();
        assert!(!provider(&dir, MemoryCredentialStore::new()).has_local().await);
    }

    #[tokio::test]
    async fn test_has_remote_requires_complete_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new().with_android_keystore(FULL_NAME, keystore(b"jks", ""));
        assert!(!provider(&dir, store).has_remote().await.unwrap());

        let store =
            MemoryCredentialStore::new().with_android_keystore(FULL_NAME, keystore(b"jks", "pass"));
        assert!(provider(&dir, store).has_remote().await.unwrap());
    }

    #[tokio::test]
    async fn test_use_remote_runs_setup() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new().generating_android_keystore(keystore(b"new", "pw"));
        let mut provider = provider(&dir, store);

        provider.use_remote().await.unwrap();

        assert_eq!(provider.credentials().unwrap().keystore, keystore(b"new", "pw"));
    }

    #[tokio::test]
    async fn test_use_remote_fails_without_valid_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new().with_android_keystore(FULL_NAME, keystore(b"", "pw"));
        let mut provider = provider(&dir, store);

        let err = provider.use_remote().await.unwrap_err();
        assert!(matches!(err, Error::RemoteSetupFailed(_)));
        assert!(!provider.is_committed());
    }

    #[tokio::test]
    async fn test_use_local_rejects_incomplete_keystore() {
        let dir = project_with_local(b"jks", "");
        let mut provider = provider(&dir, MemoryCredentialStore::new());

        let err = provider.use_local().await.unwrap_err();
        assert!(matches!(err, Error::InvalidLocalCredentials(_)));
        assert!(matches!(
            provider.credentials(),
            Err(Error::NoCredentialsCommitted)
        ));
    }

    #[tokio::test]
    async fn test_is_local_synced() {
        let dir = project_with_local(b"jks", "storepass");

        let same = MemoryCredentialStore::new()
            .with_android_keystore(FULL_NAME, keystore(b"jks", "storepass"));
        assert!(provider(&dir, same).is_local_synced().await);

        let drifted = MemoryCredentialStore::new()
            .with_android_keystore(FULL_NAME, keystore(b"jks", "rotated"));
        assert!(!provider(&dir, drifted).is_local_synced().await);
    }

    #[tokio::test]
    async fn test_is_local_synced_when_a_side_fails() {
        let no_local = tempfile::tempdir().unwrap();
        let store = MemoryCredentialStore::new()
            .with_android_keystore(FULL_NAME, keystore(b"jks", "storepass"));
        assert!(provider(&no_local, store).is_local_synced().await);

        let dir = project_with_local(b"jks", "storepass");
        let failing = MemoryCredentialStore::new().failing("service unavailable");
        assert!(provider(&dir, failing).is_local_synced().await);
    }
}
