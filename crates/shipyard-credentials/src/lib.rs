//! Signing credentials for Shipyard builds.
//!
//! Provides:
//! - The project-local credentials.json store
//! - Android and iOS credentials providers
//! - The policy that picks between local and remote credentials
//! - Remote store and prompt implementations
//!
//! The `test-util` feature adds an in-memory remote store for tests.

pub mod http;
pub mod local;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod prompt;
pub mod provider;
pub mod reconcile;

pub use http::HttpCredentialStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryCredentialStore;
pub use prompt::{NonInteractivePrompter, TerminalPrompter};
pub use provider::{AndroidCredentialsProvider, CredentialsProvider, IosCredentialsProvider};
pub use reconcile::{Reconciliation, ensure_credentials};

pub use shipyard_core::{
    AndroidCredentials, CredentialsSource, IosCredentials, Prompter, RemoteCredentialStore,
};
