//! `index.ts` barrel files for an output tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::doctype_map::DOCTYPE_MAP_NAME;
use super::Error;

const INDEX_NAME: &str = "index";

/// Write an `index.ts` into every directory of the tree, re-exporting the
/// type files it holds and namespacing its subdirectories.
pub fn write_indexes(tree_root: &Path) -> Result<Vec<PathBuf>, Error> {
    if !tree_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for entry in WalkDir::new(tree_root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            written.push(write_index(entry.path())?);
        }
    }
    Ok(written)
}

fn write_index(dir: &Path) -> Result<PathBuf, Error> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if entry.file_type()?.is_dir() {
            dirs.push(name.to_string());
        } else if let Some(stem) = type_file_stem(name) {
            if stem != INDEX_NAME && stem != DOCTYPE_MAP_NAME {
                files.push(stem.to_string());
            }
        }
    }
    files.sort();
    dirs.sort();

    let mut content = String::new();
    for stem in &files {
        content.push_str(&format!("export * from \"./{}\";\n", stem));
    }
    for name in &dirs {
        content.push_str(&format!(
            "export * as {} from \"./{}/index\";\n",
            namespace_ident(name),
            name
        ));
    }

    let path = dir.join(format!("{}.ts", INDEX_NAME));
    std::fs::write(&path, content)?;
    tracing::debug!(path = ?path, "Wrote index");
    Ok(path)
}

fn type_file_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(".d.ts")
        .or_else(|| file_name.strip_suffix(".ts"))
}

/// Valid identifier for a directory namespace.
fn namespace_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
