//! Core domain types and traits for Shipyard.
//!
//! This crate contains:
//! - Platform, workflow and credentials-source enumerations
//! - Signing credential bundles for Android and iOS
//! - Project identity used to address the remote credential store
//! - Collaborator traits (remote credential store, interactive prompts)

pub mod credentials;
pub mod error;
pub mod platform;
pub mod project;
pub mod prompt;
pub mod remote;

pub use credentials::{
    AndroidCredentials, CredentialsSource, DistributionCertificate, IosCredentials, Keystore,
    ProvisioningProfile,
};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformSelection, Workflow};
pub use project::ProjectContext;
pub use prompt::Prompter;
pub use remote::RemoteCredentialStore;
