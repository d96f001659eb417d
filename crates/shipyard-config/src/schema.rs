//! Preset schema validation.
//!
//! Validation is exhaustive: every violated field is reported, not just the
//! first. Fields a schema does not know are dropped from the output. Strings
//! are trimmed; no other type coercion happens.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shipyard_core::{Platform, Workflow};
use std::fmt;

use crate::preset::{AndroidPreset, IosPreset, Preset};
use crate::{ConfigError, ConfigResult};

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the field, relative to the validated object.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" {}", self.path, self.message)
    }
}

/// Accepted shape of a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Boolean,
    OneOf(&'static [&'static str]),
}

impl FieldKind {
    fn coerce(&self, value: &Value) -> Result<Value, String> {
        match (self, value) {
            (FieldKind::String, Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Err("is not allowed to be empty".to_string())
                } else {
                    Ok(Value::String(trimmed.to_string()))
                }
            }
            (FieldKind::String, _) => Err("must be a string".to_string()),
            (FieldKind::Boolean, Value::Bool(b)) => Ok(Value::Bool(*b)),
            (FieldKind::Boolean, _) => Err("must be a boolean".to_string()),
            (FieldKind::OneOf(allowed), Value::String(s)) if allowed.contains(&s.trim()) => {
                Ok(Value::String(s.trim().to_string()))
            }
            (FieldKind::OneOf(allowed), _) => {
                Err(format!("must be one of [{}]", allowed.join(", ")))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Schema for a flat JSON object.
#[derive(Debug)]
pub struct ObjectSchema {
    pub(crate) fields: &'static [FieldRule],
}

impl ObjectSchema {
    /// Validate `value`, returning a copy holding only the known fields.
    pub fn validate(&self, value: &Value) -> Result<Map<String, Value>, Vec<Violation>> {
        self.validate_at("", value)
    }

    /// Like [`ObjectSchema::validate`], reporting paths under `prefix`.
    pub fn validate_at(
        &self,
        prefix: &str,
        value: &Value,
    ) -> Result<Map<String, Value>, Vec<Violation>> {
        let Some(object) = value.as_object() else {
            let path = if prefix.is_empty() { "value" } else { prefix };
            return Err(vec![Violation::new(path, "must be of type object")]);
        };

        let mut output = Map::new();
        let mut violations = Vec::new();

        for rule in self.fields {
            let path = join_path(prefix, rule.name);
            match object.get(rule.name) {
                None if rule.required => violations.push(Violation::new(path, "is required")),
                None => {}
                Some(raw) => match rule.kind.coerce(raw) {
                    Ok(coerced) => {
                        output.insert(rule.name.to_string(), coerced);
                    }
                    Err(message) => violations.push(Violation::new(path, message)),
                },
            }
        }

        if violations.is_empty() {
            Ok(output)
        } else {
            Err(violations)
        }
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

static ANDROID_GENERIC: ObjectSchema = ObjectSchema {
    fields: &[
        FieldRule::required("workflow", FieldKind::OneOf(&["generic"])),
        FieldRule::optional("buildCommand", FieldKind::String),
        FieldRule::optional("artifactPath", FieldKind::String),
        FieldRule::optional("withoutCredentials", FieldKind::Boolean),
    ],
};

static ANDROID_MANAGED: ObjectSchema = ObjectSchema {
    fields: &[
        FieldRule::required("workflow", FieldKind::OneOf(&["managed"])),
        FieldRule::optional("buildType", FieldKind::OneOf(&["apk", "app-bundle"])),
    ],
};

static IOS_GENERIC: ObjectSchema = ObjectSchema {
    fields: &[FieldRule::required("workflow", FieldKind::OneOf(&["generic"]))],
};

static IOS_MANAGED: ObjectSchema = ObjectSchema {
    fields: &[
        FieldRule::required("workflow", FieldKind::OneOf(&["managed"])),
        FieldRule::optional("buildType", FieldKind::OneOf(&["archive", "simulator"])),
    ],
};

/// Look up the preset schema for a (platform, workflow) pair.
pub fn preset_schema(platform: Platform, workflow: Workflow) -> &'static ObjectSchema {
    match (platform, workflow) {
        (Platform::Android, Workflow::Generic) => &ANDROID_GENERIC,
        (Platform::Android, Workflow::Managed) => &ANDROID_MANAGED,
        (Platform::Ios, Workflow::Generic) => &IOS_GENERIC,
        (Platform::Ios, Workflow::Managed) => &IOS_MANAGED,
    }
}

/// Validate a raw preset body and decode it as `T`.
///
/// The schema is chosen by `platform` and the body's own `workflow` field.
/// `object` names the preset in error messages (e.g. `android.release`).
pub fn validate_preset_as<T: DeserializeOwned>(
    platform: Platform,
    object: &str,
    raw: &Value,
) -> ConfigResult<T> {
    let workflow = raw
        .get("workflow")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    let workflow: Workflow = workflow.parse().map_err(|_| ConfigError::UnknownWorkflow {
        platform,
        workflow: workflow.to_string(),
    })?;
    let schema = preset_schema(platform, workflow);

    let cleaned = schema
        .validate(raw)
        .map_err(|violations| ConfigError::SchemaValidation {
            object: object.to_string(),
            violations,
        })?;

    serde_json::from_value(Value::Object(cleaned)).map_err(|e| ConfigError::SchemaValidation {
        object: object.to_string(),
        violations: vec![Violation::new(object, e.to_string())],
    })
}

/// Validate a raw preset body for `platform`.
pub fn validate(platform: Platform, object: &str, raw: &Value) -> ConfigResult<Preset> {
    match platform {
        Platform::Android => validate_preset_as::<AndroidPreset>(platform, object, raw)
            .map(Preset::Android),
        Platform::Ios => validate_preset_as::<IosPreset>(platform, object, raw).map(Preset::Ios),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{AndroidBuildType, AndroidGenericPreset, AndroidManagedPreset};
    use serde_json::json;

    #[test]
    fn test_strips_unknown_fields() {
        let preset = validate(
            Platform::Android,
            "android.release",
            &json!({ "workflow": "generic", "gradleFlavor": "prod", "artifactPath": " app.aab " }),
        )
        .unwrap();

        assert_eq!(
            preset,
            Preset::Android(AndroidPreset::Generic(AndroidGenericPreset {
                build_command: None,
                artifact_path: Some("app.aab".to_string()),
                without_credentials: None,
            }))
        );
    }

    #[test]
    fn test_rejects_build_type_from_other_platform() {
        let err = validate(
            Platform::Android,
            "android.release",
            &json!({ "workflow": "managed", "buildType": "archive" }),
        )
        .unwrap_err();

        match err {
            ConfigError::SchemaValidation { object, violations } => {
                assert_eq!(object, "android.release");
                assert_eq!(
                    violations,
                    vec![Violation::new("buildType", "must be one of [apk, app-bundle]")]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reports_every_violation() {
        let err = validate(
            Platform::Android,
            "android.debug",
            &json!({
                "workflow": "generic",
                "buildCommand": 42,
                "artifactPath": "   ",
                "withoutCredentials": "true"
            }),
        )
        .unwrap_err();

        let ConfigError::SchemaValidation { violations, .. } = &err else {
            panic!("unexpected error: {err:?}");
        };
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["buildCommand", "artifactPath", "withoutCredentials"]);

        let message = err.to_string();
        assert!(message.starts_with("android.debug is not valid"));
        assert!(message.contains("\"withoutCredentials\" must be a boolean"));
    }

    #[test]
    fn test_unknown_workflow() {
        let err = validate(Platform::Ios, "ios.release", &json!({ "workflow": "bare" })).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownWorkflow { platform: Platform::Ios, .. }
        ));
    }

    #[test]
    fn test_managed_android_build_type() {
        let preset: AndroidPreset = validate_preset_as(
            Platform::Android,
            "android.release",
            &json!({ "workflow": "managed", "buildType": "app-bundle" }),
        )
        .unwrap();
        assert_eq!(
            preset,
            AndroidPreset::Managed(AndroidManagedPreset {
                build_type: Some(AndroidBuildType::AppBundle)
            })
        );
    }

    #[test]
    fn test_non_object_body() {
        let violations = ANDROID_MANAGED.validate_at("android.release", &json!("apk")).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::new("android.release", "must be of type object")]
        );
    }
}
