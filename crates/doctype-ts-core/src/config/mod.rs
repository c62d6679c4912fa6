mod environment;
mod generation;
mod provider;

pub use environment::SiteEnvironment;
pub use generation::{AppTypeSetting, GenerationSettings};
pub use provider::{ConfigFile, EnvironmentProvider, SettingsProvider};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use toml_edit::{DocumentMut, Item};

use crate::error::{DoctypeError, Result};

/// Root configuration for doctype-ts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctypeTsConfig {
    /// Type generation settings.
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Site environment flags.
    #[serde(default)]
    pub environment: SiteEnvironment,
}

impl DoctypeTsConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DoctypeError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        toml::from_str(&content)
            .map_err(|e| DoctypeError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DoctypeError::Serialization(format!("Failed to render config: {}", e)))
    }

    /// Rewrite `raw` so that only the keys where `self` differs from
    /// `before` change. Comments and `${VAR}` placeholders of the other
    /// keys are kept as written.
    pub fn merge_into_toml(&self, raw: &str, before: &Self) -> Result<String> {
        let mut document: DocumentMut = raw
            .parse()
            .map_err(|e| DoctypeError::Config(format!("Failed to parse config: {}", e)))?;
        let before = before.to_document()?;
        let after = self.to_document()?;

        for (section, item) in after.iter() {
            let Some(after_table) = item.as_table_like() else {
                continue;
            };
            let before_table = before.get(section).and_then(Item::as_table_like);

            let changed: Vec<(String, Item)> = after_table
                .iter()
                .filter(|(key, value)| {
                    before_table
                        .and_then(|t| t.get(key))
                        .map(|b| b.to_string())
                        != Some(value.to_string())
                })
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            let removed: Vec<String> = before_table
                .map(|t| {
                    t.iter()
                        .filter(|(key, _)| !after_table.contains_key(key))
                        .map(|(key, _)| key.to_string())
                        .collect()
                })
                .unwrap_or_default();
            if changed.is_empty() && removed.is_empty() {
                continue;
            }

            if !document.get(section).is_some_and(Item::is_table_like) {
                document.insert(section, toml_edit::table());
            }
            let Some(target) = document.get_mut(section).and_then(Item::as_table_like_mut) else {
                continue;
            };
            for (key, value) in changed {
                target.insert(&key, value);
            }
            for key in removed {
                target.remove(&key);
            }
        }

        Ok(document.to_string())
    }

    fn to_document(&self) -> Result<DocumentMut> {
        self.to_toml()?
            .parse()
            .map_err(|e| DoctypeError::Serialization(format!("Failed to render config: {}", e)))
    }

    /// Write the configuration to a TOML file, replacing its contents.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_toml()?)?;
        Ok(())
    }
}

static ENV_VAR: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
});

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    for cap in ENV_VAR.captures_iter(content) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(value) => result = result.replace(&cap[0], &value),
            Err(_) => tracing::debug!(var = %var_name, "Environment variable not set, leaving placeholder"),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_empty_config() {
        let config = DoctypeTsConfig::parse_toml("").unwrap();
        assert_eq!(config, DoctypeTsConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [generation]
            export_to_root = true
            root_output_path = "frontend/types"
            include_custom_doctypes = true
            declaration_files = true
            base_output_path = "/srv/bench"

            [[generation.type_settings]]
            app_name = "library"
            app_path = "frontend/src"

            [[generation.type_settings]]
            app_name = "billing"

            [environment]
            developer_mode = true
            generation_paused = true
            bench_root = "/srv/bench"
        "#;

        let config = DoctypeTsConfig::parse_toml(toml).unwrap();
        let generation = &config.generation;
        assert!(generation.export_to_root);
        assert!(generation.include_custom_doctypes);
        assert_eq!(generation.file_extension(), "d.ts");
        assert_eq!(generation.root_output_path, PathBuf::from("frontend/types"));
        assert_eq!(generation.base_output_path, Some(PathBuf::from("/srv/bench")));
        assert_eq!(generation.type_settings.len(), 2);
        assert_eq!(generation.app_setting("billing").unwrap().app_path, "");

        assert!(config.environment.developer_mode);
        assert!(config.environment.generation_paused);
        assert!(!config.environment.bulk_operation_in_progress);
    }

    #[test]
    fn test_invalid_config_is_a_config_error() {
        let err = DoctypeTsConfig::parse_toml("[generation]\nexport_to_root = \"yes\"").unwrap_err();
        assert!(matches!(err, DoctypeError::Config(_)));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DOCTYPE_TS_TEST_BENCH", "/opt/bench");

        let toml = r#"
            [environment]
            bench_root = "${DOCTYPE_TS_TEST_BENCH}"
        "#;

        let config = DoctypeTsConfig::parse_toml(toml).unwrap();
        assert_eq!(config.environment.bench_root, PathBuf::from("/opt/bench"));

        std::env::remove_var("DOCTYPE_TS_TEST_BENCH");
    }

    #[test]
    fn test_merge_only_touches_changed_keys() {
        let raw = "# bench settings\n[environment]\ndeveloper_mode = true # local only\nbench_root = \"${DOCTYPE_TS_MERGE_ROOT}\"\n";
        let before = DoctypeTsConfig::parse_toml(raw).unwrap();
        let mut after = before.clone();
        after.environment.generation_paused = true;

        let merged = after.merge_into_toml(raw, &before).unwrap();
        assert!(merged.starts_with("# bench settings\n[environment]\n"));
        assert!(merged.contains("developer_mode = true # local only\n"));
        assert!(merged.contains("bench_root = \"${DOCTYPE_TS_MERGE_ROOT}\"\n"));
        assert!(merged.contains("generation_paused"));
        assert!(!merged.contains("[generation]"));
        assert_eq!(DoctypeTsConfig::parse_toml(&merged).unwrap(), after);
    }

    #[test]
    fn test_merge_adds_and_removes_keys() {
        let raw = "[generation]\nbase_output_path = \"/srv/out\"\n";
        let before = DoctypeTsConfig::parse_toml(raw).unwrap();
        let mut after = before.clone();
        after.generation.base_output_path = None;
        after.generation = after.generation.with_app("library", "frontend");

        let merged = after.merge_into_toml(raw, &before).unwrap();
        assert!(!merged.contains("base_output_path"));
        assert_eq!(DoctypeTsConfig::parse_toml(&merged).unwrap(), after);
    }

    #[test]
    fn test_write_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");

        let mut config = DoctypeTsConfig::default();
        config.generation = config.generation.with_app("library", "frontend/src");
        config.environment.developer_mode = true;
        config.write_file(&path).unwrap();

        assert_eq!(DoctypeTsConfig::from_file(&path).unwrap(), config);
    }
}
