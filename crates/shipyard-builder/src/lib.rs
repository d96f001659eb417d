//! Per-platform build job assembly for Shipyard.
//!
//! A builder owns one platform's resolved preset, loads signing credentials
//! when the preset needs them, and turns both into a job description for the
//! build service.

pub mod android;
pub mod ios;
pub mod job;

pub use android::AndroidBuilder;
pub use ios::IosBuilder;
pub use job::{AndroidJob, AndroidJobKind, IosJob, IosJobKind, Job};

use async_trait::async_trait;
use shipyard_core::{
    CredentialsSource, Platform, ProjectContext, Prompter, RemoteCredentialStore, Result,
};
use std::sync::Arc;

/// Everything a builder needs from the surrounding command.
#[derive(Clone)]
pub struct BuilderContext {
    pub project: ProjectContext,
    pub credentials_source: CredentialsSource,
    pub store: Arc<dyn RemoteCredentialStore>,
    pub prompter: Arc<dyn Prompter>,
}

/// Trait for per-platform builders.
#[async_trait]
pub trait Builder: Send + Sync {
    fn platform(&self) -> Platform;

    /// Resolve signing credentials, if this build needs any.
    async fn ensure_credentials(&mut self) -> Result<()>;

    /// Describe the build job for a project archive at `archive_url`.
    fn prepare_job(&self, archive_url: &str) -> Job;
}
