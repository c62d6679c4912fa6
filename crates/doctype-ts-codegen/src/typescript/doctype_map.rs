//! The `DocTypeMap` declaration of an output tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::field_type::string_literal;
use super::pass::GeneratedTypeRecord;
use super::Error;

/// File stem of the map declaration.
pub const DOCTYPE_MAP_NAME: &str = "DocTypeMap";

/// Render the map for one tree. Records are deduplicated by identifier,
/// first occurrence wins.
pub fn render_doctype_map(records: &[GeneratedTypeRecord]) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&GeneratedTypeRecord> = records
        .iter()
        .filter(|r| seen.insert(r.type_name.as_str()))
        .collect();

    let mut out = String::from("// Auto-generated by doctype-ts - DO NOT EDIT\n");
    for record in &unique {
        out.push_str(&format!(
            "import {{ {} }} from '{}';\n",
            record.type_name,
            record.import_path()
        ));
    }
    out.push('\n');
    out.push_str("export type DocTypeMap = {\n");
    for record in &unique {
        out.push_str(&format!(
            "\t{}: {};\n",
            string_literal(&record.doctype),
            record.type_name
        ));
    }
    out.push_str("};\n\n");
    out.push_str("declare global {\n");
    out.push_str("\tinterface DocTypeMapGlobal extends DocTypeMap {}\n");
    out.push_str("}\n");
    out
}

/// Write the map for one tree root.
pub fn write_doctype_map(
    tree_root: &Path,
    records: &[GeneratedTypeRecord],
    extension: &str,
) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(tree_root)?;
    let path = tree_root.join(format!("{}.{}", DOCTYPE_MAP_NAME, extension));
    std::fs::write(&path, render_doctype_map(records))?;
    tracing::debug!(path = ?path, types = records.len(), "Wrote DocTypeMap");
    Ok(path)
}

/// Write one map per tree.
///
/// Records are grouped by their tree root; a tree with no records gets an
/// empty map.
pub fn write_doctype_maps(
    trees: &[PathBuf],
    records: &[GeneratedTypeRecord],
    extension: &str,
) -> Result<Vec<PathBuf>, Error> {
    let mut roots: Vec<&Path> = trees.iter().map(PathBuf::as_path).collect();
    for record in records {
        if !roots.contains(&record.tree_root.as_path()) {
            roots.push(&record.tree_root);
        }
    }

    roots
        .into_iter()
        .map(|root| {
            let group: Vec<GeneratedTypeRecord> = records
                .iter()
                .filter(|r| r.tree_root == root)
                .cloned()
                .collect();
            write_doctype_map(root, &group, extension)
        })
        .collect()
}
