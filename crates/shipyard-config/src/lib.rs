//! Build preset configuration for Shipyard.
//!
//! This crate handles:
//! - Reading and shape-checking shipyard.json
//! - Selecting a named preset per requested platform
//! - Validating presets against per-(platform, workflow) schemas

pub mod error;
pub mod preset;
pub mod reader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use preset::{
    AndroidBuildType, AndroidGenericPreset, AndroidManagedPreset, AndroidPreset, IosBuildType,
    IosGenericPreset, IosManagedPreset, IosPreset, Preset,
};
pub use reader::{
    CONFIG_FILE_NAME, ConfigReader, PlatformResolution, RawConfiguration, ReaderOptions,
    ResolvedConfiguration,
};
pub use schema::Violation;
