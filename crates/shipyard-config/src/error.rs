//! Configuration errors.

use shipyard_core::Platform;
use std::path::PathBuf;
use thiserror::Error;

use crate::schema::Violation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{object} is not valid [{}]", join_violations(.violations))]
    SchemaValidation {
        /// Path of the offending object, e.g. `android.release`.
        object: String,
        violations: Vec<Violation>,
    },

    #[error("there is no preset named {preset} for platform {platform}")]
    PresetNotFound { preset: String, platform: Platform },

    #[error("invalid workflow '{workflow}' for platform {platform}")]
    UnknownWorkflow { platform: Platform, workflow: String },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
