//! Loader for framework DocType definitions stored as JSON.
//!
//! Reads an apps directory laid out as `<apps>/<app>/<app>/...` and fills an
//! [`InMemoryRegistry`] with the DocTypes and custom field fixtures found in
//! each app package.

use std::path::{Path, PathBuf};

use doctype_ts_core::{
    FieldDescriptor, FieldKind, InMemoryRegistry, NamingRule, SchemaDescriptor,
};
use serde::{Deserialize, Deserializer};
use walkdir::{DirEntry, WalkDir};

use crate::Error;

/// Counts of what was loaded from an app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub doctypes: usize,
    pub custom_fields: usize,
}

#[derive(Debug, Deserialize)]
struct RawDocType {
    #[serde(default)]
    doctype: Option<String>,
    name: String,
    module: String,
    #[serde(default, deserialize_with = "flag")]
    istable: bool,
    #[serde(default, deserialize_with = "flag")]
    is_virtual: bool,
    #[serde(default, deserialize_with = "flag")]
    custom: bool,
    #[serde(default)]
    naming_rule: Option<String>,
    #[serde(default)]
    autoname: Option<String>,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default)]
    fieldname: Option<String>,
    fieldtype: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    options: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    reqd: bool,
}

#[derive(Debug, Deserialize)]
struct RawCustomization {
    #[serde(default)]
    custom_fields: Vec<RawCustomField>,
}

#[derive(Debug, Deserialize)]
struct RawCustomField {
    dt: String,
    #[serde(default)]
    insert_after: Option<String>,
    #[serde(flatten)]
    field: RawField,
}

/// Checkbox values are stored as 0/1, occasionally as booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(serde_json::Value::String(s)) => s.trim() == "1",
        _ => false,
    })
}

impl RawField {
    fn into_descriptor(self) -> Option<FieldDescriptor> {
        let fieldname = self.fieldname.filter(|n| !n.is_empty())?;
        let mut field = FieldDescriptor::new(fieldname, FieldKind::parse(&self.fieldtype));
        field.label = self.label.filter(|l| !l.is_empty());
        field.description = self.description.filter(|d| !d.is_empty());
        field.options = self.options.unwrap_or_default();
        field.required = self.reqd;
        Some(field)
    }
}

impl RawDocType {
    fn into_descriptor(self, app: &str) -> SchemaDescriptor {
        let autoincrement = self.naming_rule.as_deref() == Some("Autoincrement")
            || self
                .autoname
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case("autoincrement"));

        let mut schema = SchemaDescriptor::new(self.name, self.module).with_app(app);
        schema.fields = self
            .fields
            .into_iter()
            .filter_map(RawField::into_descriptor)
            .collect();
        schema.is_table = self.istable;
        schema.is_virtual = self.is_virtual;
        schema.is_custom = self.custom;
        if autoincrement {
            schema.naming_rule = NamingRule::Autoincrement;
        }
        schema
    }
}

/// Load every app found in an apps directory.
pub fn load_bench(apps_dir: &Path) -> Result<InMemoryRegistry, Error> {
    let registry = InMemoryRegistry::new();

    let mut apps: Vec<(String, PathBuf)> = std::fs::read_dir(apps_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let app = e.file_name().to_str()?.to_string();
            let package = e.path().join(&app);
            package.is_dir().then_some((app, package))
        })
        .collect();
    apps.sort();

    for (app, package) in &apps {
        let summary = load_app(&registry, app, package)?;
        tracing::debug!(
            app = %app,
            doctypes = summary.doctypes,
            custom_fields = summary.custom_fields,
            "Loaded app schemas"
        );
    }

    Ok(registry)
}

/// Load the modules, DocTypes and custom fields of one app package.
pub fn load_app(
    registry: &InMemoryRegistry,
    app: &str,
    package_dir: &Path,
) -> Result<LoadSummary, Error> {
    let mut summary = LoadSummary::default();

    let modules_file = package_dir.join("modules.txt");
    if modules_file.is_file() {
        for module in std::fs::read_to_string(&modules_file)?
            .lines()
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            registry.register_module(app, module)?;
        }
    }

    let mut customizations = Vec::new();
    for entry in WalkDir::new(package_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        if is_doctype_file(path) {
            match read_doctype(path) {
                Ok(Some(raw)) => {
                    registry.register_schema(raw.into_descriptor(app))?;
                    summary.doctypes += 1;
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(file = ?path, error = %e, "Failed to parse DocType"),
            }
        } else if parent_name(path) == Some("custom") {
            customizations.push(path.to_path_buf());
        }
    }

    // Fixtures may target DocTypes loaded after them in walk order.
    for path in &customizations {
        let customization: RawCustomization = match read_json(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(file = ?path, error = %e, "Failed to parse customization");
                continue;
            }
        };
        for custom in customization.custom_fields {
            let dt = custom.dt;
            let Some(field) = custom.field.into_descriptor() else {
                continue;
            };
            match registry.insert_custom_field(&dt, field, custom.insert_after.as_deref()) {
                Ok(()) => summary.custom_fields += 1,
                Err(e) => tracing::debug!(doctype = %dt, error = %e, "Skipping custom field"),
            }
        }
    }

    Ok(summary)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with('.') || n == "node_modules" || n == "__pycache__")
}

fn parent_name(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

/// `.../doctype/<name>/<name>.json`
fn is_doctype_file(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    let Some(dir) = path.parent() else {
        return false;
    };
    parent_name(path) == Some(stem) && parent_name(dir) == Some("doctype")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_doctype(path: &Path) -> Result<Option<RawDocType>, Error> {
    let raw: RawDocType = read_json(path)?;
    if raw.doctype.as_deref().is_some_and(|d| d != "DocType") {
        return Ok(None);
    }
    Ok(Some(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctype_ts_core::SchemaRegistry;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn library_app(apps: &Path) -> PathBuf {
        let package = apps.join("library/library");
        write(&package.join("modules.txt"), "Library Management\n\nCirculation\n");
        write(
            &package.join("library_management/doctype/article/article.json"),
            r#"{
                "doctype": "DocType",
                "name": "Article",
                "module": "Library Management",
                "istable": 0,
                "custom": 0,
                "naming_rule": "By fieldname",
                "fields": [
                    {"fieldname": "title", "fieldtype": "Data", "label": "Title", "reqd": 1},
                    {"fieldname": "sb", "fieldtype": "Section Break"},
                    {"fieldname": "status", "fieldtype": "Select", "options": "Issued\nAvailable", "reqd": 0},
                    {"fieldname": "notes", "fieldtype": "Small Text", "description": null}
                ]
            }"#,
        );
        write(
            &package.join("library_management/doctype/article_author/article_author.json"),
            r#"{
                "doctype": "DocType",
                "name": "Article Author",
                "module": "Library Management",
                "istable": 1,
                "autoname": "autoincrement",
                "fields": [{"fieldname": "author", "fieldtype": "Data"}]
            }"#,
        );
        write(
            &package.join("circulation/custom/article.json"),
            r#"{
                "custom_fields": [
                    {"dt": "Article", "fieldname": "isbn", "fieldtype": "Data", "label": "ISBN"},
                    {"dt": "Unknown", "fieldname": "x", "fieldtype": "Data"}
                ]
            }"#,
        );
        package
    }

    #[test]
    fn test_load_app() {
        let dir = tempdir().unwrap();
        let package = library_app(dir.path());
        let registry = InMemoryRegistry::new();

        let summary = load_app(&registry, "library", &package).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                doctypes: 2,
                custom_fields: 1
            }
        );

        let article = registry.get_schema("Article").unwrap().unwrap();
        assert_eq!(article.app.as_deref(), Some("library"));
        assert_eq!(article.naming_rule, NamingRule::Named);
        assert!(!article.is_table);
        assert_eq!(article.fields.len(), 5);
        assert!(article.fields[0].required);
        assert_eq!(article.fields[1].fieldtype, FieldKind::SectionBreak);
        assert_eq!(article.fields[2].options, "Issued\nAvailable");
        assert_eq!(article.fields[3].description, None);
        assert_eq!(article.fields[4].fieldname, "isbn");
        assert!(article.fields[4].is_custom_field);

        let author = registry.get_schema("Article Author").unwrap().unwrap();
        assert!(author.is_table);
        assert_eq!(author.naming_rule, NamingRule::Autoincrement);

        assert_eq!(
            registry.list_modules("library").unwrap(),
            vec!["Library Management", "Circulation"]
        );
        assert_eq!(
            registry.module_app("Circulation").unwrap().as_deref(),
            Some("library")
        );
    }

    #[test]
    fn test_custom_fields_follow_insert_after() {
        let dir = tempdir().unwrap();
        let package = library_app(dir.path());
        write(
            &package.join("circulation/custom/article.json"),
            r#"{
                "custom_fields": [
                    {"dt": "Article", "fieldname": "isbn", "fieldtype": "Data", "insert_after": "title"},
                    {"dt": "Article", "fieldname": "shelf", "fieldtype": "Data", "insert_after": ""}
                ]
            }"#,
        );

        let registry = InMemoryRegistry::new();
        load_app(&registry, "library", &package).unwrap();

        let article = registry.get_schema("Article").unwrap().unwrap();
        let names: Vec<&str> = article.fields.iter().map(|f| f.fieldname.as_str()).collect();
        assert_eq!(names, vec!["title", "isbn", "sb", "status", "notes", "shelf"]);
        assert!(article.fields[1].is_custom_field);
    }

    #[test]
    fn test_malformed_files_are_skipped() {
        let dir = tempdir().unwrap();
        let package = library_app(dir.path());
        write(
            &package.join("library_management/doctype/broken/broken.json"),
            "{ not json",
        );
        write(
            &package.join("library_management/doctype/article/article_list.json"),
            r#"{"name": "Not a doctype"}"#,
        );

        let registry = InMemoryRegistry::new();
        let summary = load_app(&registry, "library", &package).unwrap();
        assert_eq!(summary.doctypes, 2);
        assert!(registry.get_schema("Not a doctype").unwrap().is_none());
    }

    #[test]
    fn test_non_doctype_documents_are_ignored() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("app/app");
        write(
            &package.join("m/doctype/report/report.json"),
            r#"{"doctype": "Report", "name": "Report", "module": "M"}"#,
        );

        let registry = InMemoryRegistry::new();
        assert_eq!(load_app(&registry, "app", &package).unwrap().doctypes, 0);
    }

    #[test]
    fn test_load_bench_discovers_apps() {
        let dir = tempdir().unwrap();
        library_app(dir.path());
        std::fs::create_dir_all(dir.path().join("not_an_app")).unwrap();
        write(&dir.path().join("apps.txt"), "library\n");

        let registry = load_bench(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.module_app("Library Management").unwrap().as_deref(),
            Some("library")
        );
    }

    #[test]
    fn test_load_bench_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_bench(&dir.path().join("missing")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_flag_accepts_numbers_and_bools() {
        let raw: RawField = serde_json::from_str(
            r#"{"fieldname": "a", "fieldtype": "Check", "reqd": true}"#,
        )
        .unwrap();
        assert!(raw.reqd);

        let raw: RawField =
            serde_json::from_str(r#"{"fieldname": "a", "fieldtype": "Check", "reqd": 0}"#)
                .unwrap();
        assert!(!raw.reqd);
    }
}
