use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime flags of the site type generation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEnvironment {
    /// Generation only runs in developer mode.
    #[serde(default)]
    pub developer_mode: bool,

    /// Set around migrations to suspend generation.
    #[serde(default)]
    pub generation_paused: bool,

    /// A migration, install, patch or setup wizard is running.
    #[serde(default)]
    pub bulk_operation_in_progress: bool,

    /// Bench directory holding `apps/`.
    #[serde(default = "default_bench_root")]
    pub bench_root: PathBuf,

    /// Apps directory, when it is not `apps/` under the bench root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps_dir: Option<PathBuf>,
}

impl Default for SiteEnvironment {
    fn default() -> Self {
        Self {
            developer_mode: false,
            generation_paused: false,
            bulk_operation_in_progress: false,
            bench_root: default_bench_root(),
            apps_dir: None,
        }
    }
}

fn default_bench_root() -> PathBuf {
    PathBuf::from(".")
}

impl SiteEnvironment {
    /// Developer-mode environment rooted at `bench_root`.
    pub fn developer(bench_root: impl Into<PathBuf>) -> Self {
        Self {
            developer_mode: true,
            bench_root: bench_root.into(),
            ..Default::default()
        }
    }

    /// Apps directory: the explicit one, else `apps/` under the bench root.
    pub fn apps_dir(&self) -> PathBuf {
        self.apps_dir
            .clone()
            .unwrap_or_else(|| self.bench_root.join("apps"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_environment_is_locked_down() {
        let env = SiteEnvironment::default();
        assert!(!env.developer_mode);
        assert!(!env.generation_paused);
        assert_eq!(env.apps_dir(), PathBuf::from("./apps"));
    }

    #[test]
    fn test_developer_environment() {
        let env = SiteEnvironment::developer("/srv/bench");
        assert!(env.developer_mode);
        assert_eq!(env.apps_dir(), PathBuf::from("/srv/bench/apps"));
    }

    #[test]
    fn test_explicit_apps_dir_wins() {
        let mut env = SiteEnvironment::developer("/srv/bench");
        env.apps_dir = Some(PathBuf::from("/opt/apps"));
        assert_eq!(env.apps_dir(), PathBuf::from("/opt/apps"));
    }
}
