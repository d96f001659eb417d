//! Error types for Shipyard.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("aborting build process, credentials are not configured")]
    CredentialsNotConfigured,

    #[error("unable to set up remote credentials: {0}")]
    RemoteSetupFailed(String),

    #[error("invalid local credentials: {0}")]
    InvalidLocalCredentials(String),

    #[error("credentials requested before a source was committed")]
    NoCredentialsCommitted,

    #[error("{0}")]
    LocalCredentials(String),

    #[error("remote credential store error: {0}")]
    Remote(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("a bundle identifier is required to build for iOS")]
    MissingBundleIdentifier,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
