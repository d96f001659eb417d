//! Interactive prompt abstraction.

use async_trait::async_trait;

use crate::Result;

/// Asks the user questions during a build.
///
/// Implementations used in non-interactive contexts must fail with
/// [`crate::Error::Prompt`] instead of waiting for input.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user to pick one of `choices`; returns the chosen index.
    async fn select(&self, message: &str, choices: &[&str]) -> Result<usize>;

    /// Ask a yes/no question.
    async fn confirm(&self, message: &str) -> Result<bool>;
}
