//! Live access to settings and environment flags.
//!
//! Providers are queried on every generation call, so edits to the
//! underlying source take effect on the next call without a restart.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{DoctypeTsConfig, GenerationSettings, SiteEnvironment};
use crate::error::{DoctypeError, Result};

/// Source of the current generation settings.
pub trait SettingsProvider: Send + Sync {
    /// Fetch the settings as they are right now.
    fn settings(&self) -> Result<GenerationSettings>;
}

/// Source of the current site environment flags.
pub trait EnvironmentProvider: Send + Sync {
    /// Fetch the environment as it is right now.
    fn environment(&self) -> Result<SiteEnvironment>;
}

impl SettingsProvider for GenerationSettings {
    fn settings(&self) -> Result<GenerationSettings> {
        Ok(self.clone())
    }
}

impl SettingsProvider for RwLock<GenerationSettings> {
    fn settings(&self) -> Result<GenerationSettings> {
        self.read()
            .map(|s| s.clone())
            .map_err(|_| DoctypeError::Config("settings lock poisoned".to_string()))
    }
}

impl EnvironmentProvider for SiteEnvironment {
    fn environment(&self) -> Result<SiteEnvironment> {
        Ok(self.clone())
    }
}

impl EnvironmentProvider for RwLock<SiteEnvironment> {
    fn environment(&self) -> Result<SiteEnvironment> {
        self.read()
            .map(|e| e.clone())
            .map_err(|_| DoctypeError::Config("environment lock poisoned".to_string()))
    }
}

/// A TOML config file, re-read on every query.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Wrap a config file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole configuration.
    pub fn load(&self) -> Result<DoctypeTsConfig> {
        DoctypeTsConfig::from_file(&self.path)
    }

    /// Load, modify and write back the configuration.
    ///
    /// Only the keys `f` changes are rewritten; the rest of the file,
    /// including comments and `${VAR}` placeholders, stays as it was.
    pub fn update(&self, f: impl FnOnce(&mut DoctypeTsConfig) -> Result<()>) -> Result<DoctypeTsConfig> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| DoctypeError::Config(format!("Failed to read config file: {}", e)))?;
        let before = DoctypeTsConfig::parse_toml(&raw)?;
        let mut config = before.clone();
        f(&mut config)?;

        std::fs::write(&self.path, config.merge_into_toml(&raw, &before)?)?;
        tracing::debug!(path = ?self.path, "Updated config file");
        Ok(config)
    }
}

impl SettingsProvider for ConfigFile {
    fn settings(&self) -> Result<GenerationSettings> {
        let settings = self.load()?.generation;
        settings.validate()?;
        Ok(settings)
    }
}

impl EnvironmentProvider for ConfigFile {
    fn environment(&self) -> Result<SiteEnvironment> {
        Ok(self.load()?.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_settings_reflect_edits() {
        let shared = RwLock::new(GenerationSettings::default());
        assert!(!shared.settings().unwrap().export_to_root);

        shared.write().unwrap().export_to_root = true;
        assert!(shared.settings().unwrap().export_to_root);
    }

    #[test]
    fn test_config_file_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");
        std::fs::write(&path, "[environment]\ndeveloper_mode = false\n").unwrap();

        let file = ConfigFile::new(&path);
        assert!(!file.environment().unwrap().developer_mode);

        std::fs::write(&path, "[environment]\ndeveloper_mode = true\n").unwrap();
        assert!(file.environment().unwrap().developer_mode);
    }

    #[test]
    fn test_config_file_validates_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");
        std::fs::write(
            &path,
            "[[generation.type_settings]]\napp_name = \"library\"\n",
        )
        .unwrap();

        let err = ConfigFile::new(&path).settings().unwrap_err();
        assert!(matches!(err, DoctypeError::Validation(_)));
    }

    #[test]
    fn test_update_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");
        std::fs::write(&path, "").unwrap();

        let file = ConfigFile::new(&path);
        file.update(|config| {
            config.environment.generation_paused = true;
            Ok(())
        })
        .unwrap();

        assert!(file.environment().unwrap().generation_paused);
    }

    #[test]
    fn test_update_keeps_placeholders_and_comments() {
        std::env::set_var("DOCTYPE_TS_UPDATE_BENCH", "/secret/expanded");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");
        std::fs::write(
            &path,
            "# keep me\n[environment]\nbench_root = \"${DOCTYPE_TS_UPDATE_BENCH}\"\n",
        )
        .unwrap();

        let file = ConfigFile::new(&path);
        let config = file
            .update(|config| {
                config.environment.generation_paused = true;
                Ok(())
            })
            .unwrap();
        assert_eq!(config.environment.bench_root, PathBuf::from("/secret/expanded"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# keep me"));
        assert!(written.contains("bench_root = \"${DOCTYPE_TS_UPDATE_BENCH}\""));
        assert!(!written.contains("/secret/expanded"));
        assert!(file.environment().unwrap().generation_paused);
        std::env::remove_var("DOCTYPE_TS_UPDATE_BENCH");
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctype-ts.toml");
        std::fs::write(&path, "# untouched\n").unwrap();

        let file = ConfigFile::new(&path);
        let result = file.update(|_| Err(DoctypeError::Validation("nope".to_string())));
        assert!(matches!(result, Err(DoctypeError::Validation(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# untouched\n");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let file = ConfigFile::new("/nonexistent/doctype-ts.toml");
        assert!(matches!(file.settings(), Err(DoctypeError::Config(_))));
    }
}
