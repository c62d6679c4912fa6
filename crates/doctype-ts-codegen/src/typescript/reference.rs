//! Resolution of child table fields to imported types.

use doctype_ts_core::{FieldDescriptor, SchemaDescriptor};

use super::compiler::SchemaCompiler;
use super::field_type::ANY_TYPE;
use super::pass::GenerationState;
use super::paths::OutputLocation;
use super::Error;

impl SchemaCompiler<'_> {
    /// Type expression and import for a `Table` / `Table MultiSelect` field.
    ///
    /// Degrades to `any` without an import when the referenced schema is
    /// unknown, or when its type file does not exist and child table
    /// generation is off.
    pub fn resolve_table_field(
        &mut self,
        field: &FieldDescriptor,
        owner: &SchemaDescriptor,
        location: &OutputLocation,
    ) -> Result<(String, Option<String>), Error> {
        let Some(referenced) = self.referenced_schema(field, owner)? else {
            return Ok((ANY_TYPE.to_string(), None));
        };

        let type_name = referenced.type_name();
        self.pass.check_identifier(&type_name, &referenced.name)?;
        let (target, import_path) = if referenced.module == owner.module {
            (location.clone(), format!("./{}", type_name))
        } else {
            let target = location.sibling(&referenced.module);
            std::fs::create_dir_all(&target.module_dir)?;
            let import_path = format!("../{}/{}", referenced.module_dir(), type_name);
            (target, import_path)
        };

        let available = match self.pass.state(&referenced.name) {
            GenerationState::Done(_) => true,
            GenerationState::InProgress => return Err(self.pass.cycle_error(&referenced.name)),
            GenerationState::NotStarted => {
                if target.type_file(&type_name, self.extension()).exists() {
                    true
                } else if self.options.generate_child_tables {
                    tracing::debug!(
                        doctype = %owner.name,
                        child = %referenced.name,
                        "Generating child table type"
                    );
                    self.write_schema(&referenced, &target)?;
                    true
                } else {
                    false
                }
            }
        };

        if available {
            Ok((
                format!("{}[]", type_name),
                Some(format!("import {{ {} }} from '{}'", type_name, import_path)),
            ))
        } else {
            Ok((ANY_TYPE.to_string(), None))
        }
    }

    fn referenced_schema(
        &self,
        field: &FieldDescriptor,
        owner: &SchemaDescriptor,
    ) -> Result<Option<SchemaDescriptor>, Error> {
        let referenced = match field.referenced_schema() {
            Some(name) => self.registry.get_schema(name)?,
            None => None,
        };
        if referenced.is_none() {
            tracing::warn!(
                doctype = %owner.name,
                field = %field.fieldname,
                referenced = %field.options,
                "Referenced child table not found"
            );
        }
        Ok(referenced)
    }
}
