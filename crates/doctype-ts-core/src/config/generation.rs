use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DoctypeError, Result};

/// Type generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Base directory for output. In per-app mode this is the apps
    /// directory; in root mode it is the directory holding the root tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_output_path: Option<PathBuf>,

    /// Write every app's types under one shared root tree.
    #[serde(default)]
    pub export_to_root: bool,

    /// Root tree location, relative to the base, in root mode.
    #[serde(default = "default_root_output_path")]
    pub root_output_path: PathBuf,

    /// Generate types for custom (UI-defined) DocTypes too.
    #[serde(default)]
    pub include_custom_doctypes: bool,

    /// Emit `.d.ts` declaration files instead of `.ts`.
    #[serde(default)]
    pub declaration_files: bool,

    /// Per-app output sub-paths.
    #[serde(default)]
    pub type_settings: Vec<AppTypeSetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_output_path: None,
            export_to_root: false,
            root_output_path: default_root_output_path(),
            include_custom_doctypes: false,
            declaration_files: false,
            type_settings: Vec::new(),
        }
    }
}

fn default_root_output_path() -> PathBuf {
    PathBuf::from("types")
}

impl GenerationSettings {
    /// Settings row for an app.
    pub fn app_setting(&self, app_name: &str) -> Option<&AppTypeSetting> {
        self.type_settings.iter().find(|s| s.app_name == app_name)
    }

    /// Configured app names, in settings order.
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.type_settings.iter().map(|s| s.app_name.as_str())
    }

    /// Extension of generated files, without the leading dot.
    pub fn file_extension(&self) -> &'static str {
        if self.declaration_files {
            "d.ts"
        } else {
            "ts"
        }
    }

    /// Add or replace the settings row for an app.
    pub fn with_app(mut self, app_name: impl Into<String>, app_path: impl Into<String>) -> Self {
        let setting = AppTypeSetting {
            app_name: app_name.into(),
            app_path: app_path.into(),
        };
        self.type_settings.retain(|s| s.app_name != setting.app_name);
        self.type_settings.push(setting);
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::with_capacity(self.type_settings.len());
        for setting in &self.type_settings {
            if setting.app_name.trim().is_empty() {
                return Err(DoctypeError::Validation(
                    "app name is required for every type setting".to_string(),
                ));
            }
            if !self.export_to_root && setting.app_path.trim().is_empty() {
                return Err(DoctypeError::Validation(format!(
                    "app path is required for {} unless export to root is enabled",
                    setting.app_name
                )));
            }
            if seen.contains(&setting.app_name.as_str()) {
                return Err(DoctypeError::Validation(format!(
                    "duplicate type setting for app {}",
                    setting.app_name
                )));
            }
            seen.push(setting.app_name.as_str());
        }
        Ok(())
    }

    /// Overlay the keys of a JSON object onto these settings.
    ///
    /// Unknown keys are rejected.
    pub fn merge_json(&mut self, overrides: serde_json::Value) -> Result<()> {
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(DoctypeError::Validation(
                "settings file must contain a JSON object".to_string(),
            ));
        };

        let mut current = serde_json::to_value(&*self)?;
        let serde_json::Value::Object(fields) = &mut current else {
            return Err(DoctypeError::Serialization(
                "settings did not serialize to an object".to_string(),
            ));
        };

        for (key, value) in overrides {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                return Err(DoctypeError::Validation(format!(
                    "unknown settings key: {}",
                    key
                )));
            }
            fields.insert(key, normalize_flag(value));
        }

        *self = serde_json::from_value(current)?;
        Ok(())
    }
}

const KNOWN_KEYS: &[&str] = &[
    "type_settings",
    "base_output_path",
    "export_to_root",
    "root_output_path",
    "include_custom_doctypes",
    "declaration_files",
];

/// Seed files store checkboxes as 0/1.
fn normalize_flag(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(n) if n.as_u64() == Some(0) => serde_json::Value::Bool(false),
        serde_json::Value::Number(n) if n.as_u64() == Some(1) => serde_json::Value::Bool(true),
        other => other,
    }
}

/// Output sub-path for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppTypeSetting {
    /// Application name.
    pub app_name: String,

    /// Path inside the app directory where `types/` is created.
    #[serde(default)]
    pub app_path: String,
}
