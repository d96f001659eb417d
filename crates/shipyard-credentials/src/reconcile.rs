//! Credential source reconciliation.
//!
//! Decides whether a build signs with the project's credentials.json or with
//! credentials stored remotely, and commits the provider to that choice.

use futures::future;
use shipyard_core::{CredentialsSource, Error, Prompter, Result, Workflow};
use tracing::{info, warn};

use crate::local::CREDENTIALS_FILE_NAME;
use crate::provider::CredentialsProvider;

const SOURCE_QUESTION: &str = "Which credentials do you want to use for this build?";
const SOURCE_CHOICES: [&str; 2] = [
    "Local credentials.json",
    "Credentials stored on the build service",
];
const GENERATE_QUESTION: &str = "Do you want to generate new credentials?";

/// What reconciliation did to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Committed to credentials.json.
    Local,
    /// Committed to the remote store.
    Remote,
    /// Local and remote already agree; the provider was left uncommitted and
    /// the build service keeps using what it has stored.
    Unchanged,
}

/// Commit `provider` to a credentials source.
///
/// Explicit `Local`/`Remote` sources are used as-is, with no existence checks
/// and no fallback. `Auto` prefers local credentials for managed projects;
/// for generic projects it asks the user when local and remote have drifted
/// apart, and offers to generate remote credentials when neither exists.
pub async fn ensure_credentials<P>(
    provider: &mut P,
    source: CredentialsSource,
    workflow: Workflow,
    prompter: &dyn Prompter,
) -> Result<Reconciliation>
where
    P: CredentialsProvider,
{
    let platform = provider.platform();
    let outcome = match (source, workflow) {
        (CredentialsSource::Local, _) => commit_local(provider).await?,
        (CredentialsSource::Remote, _) => commit_remote(provider).await?,
        (CredentialsSource::Auto, Workflow::Managed) => {
            if provider.has_local().await {
                commit_local(provider).await?
            } else {
                commit_remote(provider).await?
            }
        }
        (CredentialsSource::Auto, Workflow::Generic) => reconcile_generic(provider, prompter).await?,
    };

    info!(%platform, %source, %workflow, ?outcome, "Credentials source resolved");
    Ok(outcome)
}

async fn reconcile_generic<P>(provider: &mut P, prompter: &dyn Prompter) -> Result<Reconciliation>
where
    P: CredentialsProvider,
{
    let (has_local, has_remote) = future::join(provider.has_local(), provider.has_remote()).await;
    let has_remote = has_remote?;

    match (has_local, has_remote) {
        (true, true) => {
            if provider.is_local_synced().await {
                return Ok(Reconciliation::Unchanged);
            }
            warn!(
                platform = %provider.platform(),
                "Content of your local {} is not the same as the credentials stored on the build service",
                CREDENTIALS_FILE_NAME
            );
            match prompter.select(SOURCE_QUESTION, &SOURCE_CHOICES).await? {
                0 => commit_local(provider).await,
                1 => commit_remote(provider).await,
                other => Err(Error::Prompt(format!(
                    "invalid selection {} for \"{}\"",
                    other, SOURCE_QUESTION
                ))),
            }
        }
        (true, false) => commit_local(provider).await,
        (false, true) => commit_remote(provider).await,
        (false, false) => {
            warn!(
                platform = %provider.platform(),
                "Credentials for this app are not configured and there is no {} in the project directory",
                CREDENTIALS_FILE_NAME
            );
            if prompter.confirm(GENERATE_QUESTION).await? {
                commit_remote(provider).await
            } else {
                Err(Error::CredentialsNotConfigured)
            }
        }
    }
}

async fn commit_local<P: CredentialsProvider>(provider: &mut P) -> Result<Reconciliation> {
    provider.use_local().await?;
    Ok(Reconciliation::Local)
}

async fn commit_remote<P: CredentialsProvider>(provider: &mut P) -> Result<Reconciliation> {
    provider.use_remote().await?;
    Ok(Reconciliation::Remote)
}
