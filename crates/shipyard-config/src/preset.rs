//! Validated build presets.
//!
//! The `workflow` field is the tag that selects the variant shape.

use serde::{Deserialize, Serialize};
use shipyard_core::{Platform, Workflow};

/// Android Gradle output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AndroidBuildType {
    Apk,
    AppBundle,
}

/// iOS managed build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IosBuildType {
    Archive,
    Simulator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidGenericPreset {
    /// Gradle task to run, e.g. `:app:bundleRelease`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// Where the build leaves its artifact, relative to the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    /// Skip signing credentials entirely (debug builds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub without_credentials: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidManagedPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<AndroidBuildType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IosGenericPreset {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosManagedPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<IosBuildType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "workflow", rename_all = "lowercase")]
pub enum AndroidPreset {
    Generic(AndroidGenericPreset),
    Managed(AndroidManagedPreset),
}

impl AndroidPreset {
    pub fn workflow(&self) -> Workflow {
        match self {
            AndroidPreset::Generic(_) => Workflow::Generic,
            AndroidPreset::Managed(_) => Workflow::Managed,
        }
    }

    /// Whether a build with this preset needs a signing keystore.
    pub fn needs_credentials(&self) -> bool {
        match self {
            AndroidPreset::Managed(_) => true,
            AndroidPreset::Generic(preset) => !preset.without_credentials.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "workflow", rename_all = "lowercase")]
pub enum IosPreset {
    Generic(IosGenericPreset),
    Managed(IosManagedPreset),
}

impl IosPreset {
    pub fn workflow(&self) -> Workflow {
        match self {
            IosPreset::Generic(_) => Workflow::Generic,
            IosPreset::Managed(_) => Workflow::Managed,
        }
    }

    /// Simulator builds are unsigned; everything else needs a certificate and profile.
    pub fn needs_credentials(&self) -> bool {
        match self {
            IosPreset::Generic(_) => true,
            IosPreset::Managed(preset) => preset.build_type == Some(IosBuildType::Archive),
        }
    }
}

/// A preset for either platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Preset {
    Android(AndroidPreset),
    Ios(IosPreset),
}

impl Preset {
    pub fn platform(&self) -> Platform {
        match self {
            Preset::Android(_) => Platform::Android,
            Preset::Ios(_) => Platform::Ios,
        }
    }

    pub fn workflow(&self) -> Workflow {
        match self {
            Preset::Android(preset) => preset.workflow(),
            Preset::Ios(preset) => preset.workflow(),
        }
    }
}
