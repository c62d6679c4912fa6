use std::path::PathBuf;

use doctype_ts_core::{SchemaDescriptor, SchemaRegistry};

use super::pass::{GeneratedTypeRecord, GenerationPass, GenerationState};
use super::paths::OutputLocation;
use super::Error;

/// Options controlling how schemas are compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Generate missing child table types on demand.
    pub generate_child_tables: bool,
    /// Include fields from custom field fixtures.
    pub custom_fields: bool,
}

/// Turns schema descriptors into TypeScript files within one pass.
pub struct SchemaCompiler<'a> {
    pub(super) registry: &'a dyn SchemaRegistry,
    pub(super) options: CompileOptions,
    pub(super) pass: &'a mut GenerationPass,
}

impl<'a> SchemaCompiler<'a> {
    /// Create a compiler bound to a pass.
    pub fn new(
        registry: &'a dyn SchemaRegistry,
        options: CompileOptions,
        pass: &'a mut GenerationPass,
    ) -> Self {
        Self {
            registry,
            options,
            pass,
        }
    }

    /// Extension of generated files.
    pub fn extension(&self) -> &'static str {
        self.pass.settings().file_extension()
    }

    /// Render a schema and write it into `location`.
    ///
    /// A schema already written in this pass is not rewritten.
    pub fn write_schema(
        &mut self,
        schema: &SchemaDescriptor,
        location: &OutputLocation,
    ) -> Result<PathBuf, Error> {
        if let GenerationState::Done(path) = self.pass.state(&schema.name) {
            return Ok(path);
        }

        let type_name = schema.type_name();
        self.pass.begin(&schema.name, &type_name)?;

        let result = self.render_schema(schema, location).and_then(|content| {
            let path = location.type_file(&type_name, self.extension());
            std::fs::create_dir_all(&location.module_dir)?;
            std::fs::write(&path, content)?;
            Ok(path)
        });

        match result {
            Ok(path) => {
                tracing::debug!(doctype = %schema.name, path = ?path, "Wrote type definition file");
                let record = GeneratedTypeRecord {
                    doctype: schema.name.clone(),
                    relative_path: location.relative_type_path(&type_name),
                    type_name,
                    tree_root: location.tree_root.clone(),
                };
                self.pass.track_tree(&location.tree_root);
                self.pass.finish(record, path.clone());
                Ok(path)
            }
            Err(e) => {
                self.pass.abort(&schema.name);
                Err(e)
            }
        }
    }
}
