//! Target platforms and project workflows.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A build target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[display("android")]
    Android,
    #[display("ios")]
    Ios,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("unknown platform '{}', expected android or ios", other)),
        }
    }
}

/// Which platforms a command should act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PlatformSelection {
    #[display("android")]
    Android,
    #[display("ios")]
    Ios,
    #[display("all")]
    All,
}

impl PlatformSelection {
    pub fn includes(&self, platform: Platform) -> bool {
        match self {
            PlatformSelection::All => true,
            PlatformSelection::Android => platform == Platform::Android,
            PlatformSelection::Ios => platform == Platform::Ios,
        }
    }

    /// Selected platforms, Android first.
    pub fn platforms(&self) -> Vec<Platform> {
        [Platform::Android, Platform::Ios]
            .into_iter()
            .filter(|p| self.includes(*p))
            .collect()
    }
}

impl From<Platform> for PlatformSelection {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Android => PlatformSelection::Android,
            Platform::Ios => PlatformSelection::Ios,
        }
    }
}

impl FromStr for PlatformSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PlatformSelection::All),
            other => other
                .parse::<Platform>()
                .map(PlatformSelection::from)
                .map_err(|_| format!("unknown platform '{}', expected android, ios or all", other)),
        }
    }
}

/// How the native project is maintained.
///
/// Generic projects carry their own native code; managed projects have it
/// generated by the build service. The workflow selects both the preset schema
/// and the credential-loading policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    #[display("generic")]
    Generic,
    #[display("managed")]
    Managed,
}

impl FromStr for Workflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "generic" => Ok(Workflow::Generic),
            "managed" => Ok(Workflow::Managed),
            other => Err(format!("unknown workflow '{}'", other)),
        }
    }
}
