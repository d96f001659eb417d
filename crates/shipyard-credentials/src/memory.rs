//! In-memory remote credential store.
//!
//! Test double for [`RemoteCredentialStore`]. Setup calls install
//! preconfigured "generated" material when nothing is stored yet.

use async_trait::async_trait;
use shipyard_core::{
    DistributionCertificate, Error, Keystore, ProvisioningProfile, RemoteCredentialStore, Result,
};
use std::collections::HashMap;
use tokio::sync::Mutex;

type IosKey = (String, String);

#[derive(Debug, Default)]
struct State {
    keystores: HashMap<String, Keystore>,
    certificates: HashMap<IosKey, DistributionCertificate>,
    profiles: HashMap<IosKey, ProvisioningProfile>,
    generated_keystore: Option<Keystore>,
    generated_certificate: Option<DistributionCertificate>,
    generated_profile: Option<ProvisioningProfile>,
    failure: Option<String>,
    setup_calls: usize,
}

impl State {
    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Remote(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    state: Mutex<State>,
}

fn ios_key(full_name: &str, bundle_identifier: &str) -> IosKey {
    (full_name.to_string(), bundle_identifier.to_string())
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_android_keystore(mut self, full_name: &str, keystore: Keystore) -> Self {
        self.state
            .get_mut()
            .keystores
            .insert(full_name.to_string(), keystore);
        self
    }

    pub fn with_ios_distribution_certificate(
        mut self,
        full_name: &str,
        bundle_identifier: &str,
        certificate: DistributionCertificate,
    ) -> Self {
        self.state
            .get_mut()
            .certificates
            .insert(ios_key(full_name, bundle_identifier), certificate);
        self
    }

    pub fn with_ios_provisioning_profile(
        mut self,
        full_name: &str,
        bundle_identifier: &str,
        profile: ProvisioningProfile,
    ) -> Self {
        self.state
            .get_mut()
            .profiles
            .insert(ios_key(full_name, bundle_identifier), profile);
        self
    }

    /// Keystore installed by `setup_android_keystore` when none is stored.
    pub fn generating_android_keystore(mut self, keystore: Keystore) -> Self {
        self.state.get_mut().generated_keystore = Some(keystore);
        self
    }

    /// Certificate and profile installed by the iOS setup calls when missing.
    pub fn generating_ios(
        mut self,
        certificate: DistributionCertificate,
        profile: ProvisioningProfile,
    ) -> Self {
        let state = self.state.get_mut();
        state.generated_certificate = Some(certificate);
        state.generated_profile = Some(profile);
        self
    }

    /// Make every call fail with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.state.get_mut().failure = Some(message.to_string());
        self
    }

    /// Number of setup calls made so far.
    pub async fn setup_calls(&self) -> usize {
        self.state.lock().await.setup_calls
    }
}

#[async_trait]
impl RemoteCredentialStore for MemoryCredentialStore {
    async fn fetch_android_keystore(&self, full_name: &str) -> Result<Option<Keystore>> {
        let state = self.state.lock().await;
        state.check()?;
        Ok(state.keystores.get(full_name).cloned())
    }

    async fn fetch_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<DistributionCertificate>> {
        let state = self.state.lock().await;
        state.check()?;
        Ok(state
            .certificates
            .get(&ios_key(full_name, bundle_identifier))
            .cloned())
    }

    async fn fetch_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<Option<ProvisioningProfile>> {
        let state = self.state.lock().await;
        state.check()?;
        Ok(state
            .profiles
            .get(&ios_key(full_name, bundle_identifier))
            .cloned())
    }

    async fn setup_android_keystore(&self, full_name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.check()?;
        state.setup_calls += 1;
        if state.keystores.contains_key(full_name) {
            return Ok(());
        }
        let keystore = state.generated_keystore.clone().ok_or_else(|| {
            Error::RemoteSetupFailed(format!("cannot generate a keystore for {}", full_name))
        })?;
        state.keystores.insert(full_name.to_string(), keystore);
        Ok(())
    }

    async fn setup_ios_distribution_certificate(
        &self,
        full_name: &str,
        bundle_identifier: &str,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        state.check()?;
        state.setup_calls += 1;
        let key = ios_key(full_name, bundle_identifier);
        if state.certificates.contains_key(&key) {
            return Ok(());
        }
        let certificate = state.generated_certificate.clone().ok_or_else(|| {
            Error::RemoteSetupFailed(format!(
                "cannot generate a distribution certificate for {}",
                bundle_identifier
            ))
        })?;
        state.certificates.insert(key, certificate);
        Ok(())
    }

    async fn setup_ios_provisioning_profile(
        &self,
        full_name: &str,
        bundle_identifier: &str,
        _certificate: &DistributionCertificate,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        state.check()?;
        state.setup_calls += 1;
        let key = ios_key(full_name, bundle_identifier);
        if state.profiles.contains_key(&key) {
            return Ok(());
        }
        let profile = state.generated_profile.clone().ok_or_else(|| {
            Error::RemoteSetupFailed(format!(
                "cannot generate a provisioning profile for {}",
                bundle_identifier
            ))
        })?;
        state.profiles.insert(key, profile);
        Ok(())
    }
}
