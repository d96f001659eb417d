//! Project identity.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The project being built and the account that owns it.
///
/// Constructed once per command and handed to every provider and builder so
/// that nothing reaches for process-wide session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Directory containing shipyard.json and credentials.json.
    pub project_dir: PathBuf,
    pub account_name: String,
    pub project_name: String,
    /// Required when building for iOS.
    pub bundle_identifier: Option<String>,
}

impl ProjectContext {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        account_name: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            account_name: account_name.into(),
            project_name: project_name.into(),
            bundle_identifier: None,
        }
    }

    pub fn with_bundle_identifier(mut self, bundle_identifier: impl Into<String>) -> Self {
        self.bundle_identifier = Some(bundle_identifier.into());
        self
    }

    /// Name addressing the project in the remote store: `@account/project`.
    pub fn full_name(&self) -> String {
        format!("@{}/{}", self.account_name, self.project_name)
    }
}
