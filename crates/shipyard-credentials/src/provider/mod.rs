//! Per-platform credentials providers.
//!
//! A provider is created for one build of one platform. It can be probed for
//! local and remote credentials any number of times, then commits to exactly
//! one source with `use_local` or `use_remote`, after which `credentials`
//! returns the bundle.

mod android;
mod ios;

pub use android::AndroidCredentialsProvider;
pub use ios::IosCredentialsProvider;

use async_trait::async_trait;
use shipyard_core::{Platform, Result};

#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Signing bundle produced by this provider.
    type Credentials: Clone + Send + Sync;

    fn platform(&self) -> Platform;

    /// Whether credentials.json holds a complete bundle for this platform.
    ///
    /// Read or parse failures count as `false`.
    async fn has_local(&self) -> bool;

    /// Whether the remote store holds a complete bundle for this platform.
    async fn has_remote(&self) -> Result<bool>;

    /// Commit to the local bundle. Fails if it is missing or incomplete.
    async fn use_local(&mut self) -> Result<()>;

    /// Run remote setup if needed, then commit to the remote bundle.
    async fn use_remote(&mut self) -> Result<()>;

    /// Compare local and remote bundles.
    ///
    /// Both sides are fetched concurrently. If either side cannot be fetched
    /// there is nothing to compare and the pair counts as synced.
    async fn is_local_synced(&self) -> bool;

    /// Whether `use_local` or `use_remote` has succeeded.
    fn is_committed(&self) -> bool;

    /// The committed bundle.
    fn credentials(&self) -> Result<&Self::Credentials>;
}
