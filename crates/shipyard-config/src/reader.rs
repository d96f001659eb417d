//! shipyard.json reader.
//!
//! The file is shape-checked loosely first (only each preset's `workflow` is
//! enforced); presets are validated fully only when requested, against the
//! schema their workflow selects.

use serde::Serialize;
use serde_json::{Map, Value};
use shipyard_core::{CredentialsSource, Platform, PlatformSelection};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::preset::{AndroidPreset, IosPreset};
use crate::schema::{self, FieldKind, FieldRule, ObjectSchema, Violation};
use crate::{ConfigError, ConfigResult};

/// Name of the build configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "shipyard.json";

static TOP_LEVEL: ObjectSchema = ObjectSchema {
    fields: &[FieldRule::optional(
        "credentialsSource",
        FieldKind::OneOf(&["local", "remote", "auto"]),
    )],
};

static PRESET_ENVELOPE: ObjectSchema = ObjectSchema {
    fields: &[FieldRule::required(
        "workflow",
        FieldKind::OneOf(&["generic", "managed"]),
    )],
};

/// shipyard.json after the top-level shape check.
#[derive(Debug, Clone, Default)]
pub struct RawConfiguration {
    pub credentials_source: Option<CredentialsSource>,
    /// Preset name to unvalidated preset body.
    pub android: Option<Map<String, Value>>,
    pub ios: Option<Map<String, Value>>,
}

impl RawConfiguration {
    /// Shape-check a parsed shipyard.json document.
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        let mut violations = Vec::new();
        let mut raw = RawConfiguration::default();

        match TOP_LEVEL.validate(value) {
            Ok(top) => {
                raw.credentials_source = top
                    .get("credentialsSource")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok());
            }
            Err(found) => violations.extend(found),
        }

        if let Some(object) = value.as_object() {
            raw.android = presets_section(object, Platform::Android, &mut violations);
            raw.ios = presets_section(object, Platform::Ios, &mut violations);
        }

        if violations.is_empty() {
            Ok(raw)
        } else {
            Err(ConfigError::SchemaValidation {
                object: CONFIG_FILE_NAME.to_string(),
                violations,
            })
        }
    }

    pub fn presets(&self, platform: Platform) -> Option<&Map<String, Value>> {
        match platform {
            Platform::Android => self.android.as_ref(),
            Platform::Ios => self.ios.as_ref(),
        }
    }
}

fn presets_section(
    root: &Map<String, Value>,
    platform: Platform,
    violations: &mut Vec<Violation>,
) -> Option<Map<String, Value>> {
    let key = platform.to_string();
    let section = root.get(&key)?;

    let Some(presets) = section.as_object() else {
        violations.push(Violation::new(key, "must be of type object"));
        return None;
    };

    for (name, body) in presets {
        let path = schema::join_path(&key, name);
        if let Err(found) = PRESET_ENVELOPE.validate_at(&path, body) {
            violations.extend(found);
        }
    }

    Some(presets.clone())
}

/// Options controlling which presets are resolved.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub platform: PlatformSelection,
    /// Overrides the file's `credentialsSource` when set.
    pub credentials_source: Option<CredentialsSource>,
}

impl ReaderOptions {
    pub fn new(platform: PlatformSelection) -> Self {
        Self {
            platform,
            credentials_source: None,
        }
    }

    pub fn with_credentials_source(mut self, source: Option<CredentialsSource>) -> Self {
        self.credentials_source = source;
        self
    }
}

/// A preset resolved for the requested platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    pub credentials_source: CredentialsSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidPreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosPreset>,
}

/// Per-platform outcomes of a preset lookup, before they are combined.
///
/// Each requested platform is resolved independently; a missing or invalid
/// preset for one platform does not prevent the other from resolving.
#[derive(Debug)]
pub struct PlatformResolution {
    pub credentials_source: CredentialsSource,
    pub android: Option<ConfigResult<AndroidPreset>>,
    pub ios: Option<ConfigResult<IosPreset>>,
}

impl PlatformResolution {
    /// Combine into a single configuration, failing on the first platform error.
    pub fn into_resolved(self) -> ConfigResult<ResolvedConfiguration> {
        Ok(ResolvedConfiguration {
            credentials_source: self.credentials_source,
            android: self.android.transpose()?,
            ios: self.ios.transpose()?,
        })
    }
}

/// Reads build presets from a project's shipyard.json.
pub struct ConfigReader {
    project_dir: PathBuf,
    options: ReaderOptions,
}

impl ConfigReader {
    pub fn new(project_dir: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            project_dir: project_dir.into(),
            options,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }

    /// Read `preset_name` for every requested platform.
    pub fn read_preset(&self, preset_name: &str) -> ConfigResult<ResolvedConfiguration> {
        self.resolve_each(preset_name)?.into_resolved()
    }

    /// Read `preset_name`, keeping each platform's outcome separate.
    pub fn resolve_each(&self, preset_name: &str) -> ConfigResult<PlatformResolution> {
        let raw = read_file(&self.config_path())?;
        Ok(self.resolve(&raw, preset_name))
    }

    /// Resolve `preset_name` from an already shape-checked file.
    pub fn resolve(&self, raw: &RawConfiguration, preset_name: &str) -> PlatformResolution {
        let credentials_source = self
            .options
            .credentials_source
            .or(raw.credentials_source)
            .unwrap_or_default();

        let android = self
            .options
            .platform
            .includes(Platform::Android)
            .then(|| lookup_preset::<AndroidPreset>(raw, Platform::Android, preset_name));
        let ios = self
            .options
            .platform
            .includes(Platform::Ios)
            .then(|| lookup_preset::<IosPreset>(raw, Platform::Ios, preset_name));

        PlatformResolution {
            credentials_source,
            android,
            ios,
        }
    }
}

fn lookup_preset<T: serde::de::DeserializeOwned>(
    raw: &RawConfiguration,
    platform: Platform,
    preset_name: &str,
) -> ConfigResult<T> {
    let body = raw
        .presets(platform)
        .and_then(|presets| presets.get(preset_name))
        .ok_or_else(|| ConfigError::PresetNotFound {
            preset: preset_name.to_string(),
            platform,
        })?;

    let object = format!("{}.{}", platform, preset_name);
    let preset = schema::validate_preset_as(platform, &object, body)?;
    debug!(%platform, preset = %preset_name, "Resolved build preset");
    Ok(preset)
}

fn read_file(path: &Path) -> ConfigResult<RawConfiguration> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    RawConfiguration::from_value(&value)
}
