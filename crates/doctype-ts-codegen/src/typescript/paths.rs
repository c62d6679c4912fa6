use std::path::{Path, PathBuf};

use doctype_ts_core::schema::to_identifier;
use doctype_ts_core::{GenerationSettings, SiteEnvironment};

use super::Error;

/// Where a module's type files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Root of the output tree; holds the `DocTypeMap`.
    pub tree_root: PathBuf,
    /// Directory for the module's type files.
    pub module_dir: PathBuf,
}

impl OutputLocation {
    /// Location of another module in the same tree (a sibling directory).
    pub fn sibling(&self, module: &str) -> Self {
        let parent = self
            .module_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.tree_root.clone());
        Self {
            tree_root: self.tree_root.clone(),
            module_dir: parent.join(to_identifier(module)),
        }
    }

    /// Type file for a generated identifier.
    pub fn type_file(&self, type_name: &str, extension: &str) -> PathBuf {
        self.module_dir.join(format!("{}.{}", type_name, extension))
    }

    /// `/`-separated path of a type file relative to the tree root,
    /// without extension.
    pub fn relative_type_path(&self, type_name: &str) -> String {
        let mut parts: Vec<String> = self
            .module_dir
            .strip_prefix(&self.tree_root)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        parts.push(type_name.to_string());
        parts.join("/")
    }
}

/// Compute and create the output directory for a module of an app.
///
/// Returns `None` when the app is not set up for generation.
pub fn resolve_output(
    app_name: &str,
    module: &str,
    settings: &GenerationSettings,
    environment: &SiteEnvironment,
) -> Result<Option<OutputLocation>, Error> {
    let module_ident = to_identifier(module);

    let location = if settings.export_to_root {
        let base = settings
            .base_output_path
            .clone()
            .unwrap_or_else(|| environment.bench_root.clone());
        let tree_root = base.join(&settings.root_output_path);
        let module_dir = tree_root.join(app_name).join(module_ident);
        OutputLocation {
            tree_root,
            module_dir,
        }
    } else {
        let apps_dir = settings
            .base_output_path
            .clone()
            .unwrap_or_else(|| environment.apps_dir());
        let app_dir = apps_dir.join(app_name);
        if !app_dir.is_dir() {
            tracing::info!(app = %app_name, path = ?app_dir, "App path does not exist, skipping type generation");
            return Ok(None);
        }

        let Some(setting) = settings.app_setting(app_name) else {
            tracing::info!(app = %app_name, "No type generation settings for app, skipping");
            return Ok(None);
        };
        if setting.app_path.trim().is_empty() {
            tracing::info!(app = %app_name, "No app path configured, skipping");
            return Ok(None);
        }

        let tree_root = app_dir.join(&setting.app_path).join("types");
        let module_dir = tree_root.join(module_ident);
        OutputLocation {
            tree_root,
            module_dir,
        }
    };

    std::fs::create_dir_all(&location.module_dir)?;
    Ok(Some(location))
}
