//! Rendering of a schema into a TypeScript interface declaration.

use doctype_ts_core::{FieldDescriptor, FieldKind, SchemaDescriptor};

use super::compiler::SchemaCompiler;
use super::field_type::optional_marker;
use super::paths::OutputLocation;
use super::Error;

/// Standard document columns present on every record.
const PREAMBLE: &str = "\tcreation: string\n\
\tmodified: string\n\
\towner: string\n\
\tmodified_by: string\n\
\tdocstatus: 0 | 1 | 2\n\
\tparent?: string\n\
\tparentfield?: string\n\
\tparenttype?: string\n\
\tidx?: number\n";

/// Doc comment emitted above a field declaration.
pub fn field_comment(field: &FieldDescriptor) -> String {
    let extra = match field.fieldtype {
        FieldKind::Link | FieldKind::Table | FieldKind::TableMultiSelect => {
            match field.description.as_deref().filter(|d| !d.is_empty()) {
                Some(description) => format!("{} - {}", field.options, description),
                None => field.options.clone(),
            }
        }
        _ => field.description.clone().unwrap_or_default(),
    };

    let mut comment = format!(
        "\t/**\t{} : {}",
        field.label.as_deref().unwrap_or_default(),
        field.fieldtype
    );
    if !extra.is_empty() {
        comment.push_str(" - ");
        comment.push_str(&extra);
    }
    comment.push_str("\t*/\n");
    comment
}

impl SchemaCompiler<'_> {
    /// Full file content for a schema.
    ///
    /// Child tables referenced by the schema may be generated as a side
    /// effect when child table generation is on.
    pub fn render_schema(
        &mut self,
        schema: &SchemaDescriptor,
        location: &OutputLocation,
    ) -> Result<String, Error> {
        let mut imports: Vec<String> = Vec::new();
        let mut body = format!("export interface {}{{\n", schema.type_name());
        body.push_str(&format!("\tname: {}\n", schema.naming_rule.name_type()));
        body.push_str(PREAMBLE);

        for field in schema
            .fields_for(self.options.custom_fields)
            .filter(|f| f.has_data())
        {
            body.push_str(&field_comment(field));

            let (ts_type, import) = self.field_type(field, schema, location)?;
            if let Some(import) = import {
                let line = format!("{}\n", import);
                if !imports.contains(&line) {
                    imports.push(line);
                }
            }

            body.push_str(&format!(
                "\t{}{}: {}\n",
                field.fieldname,
                optional_marker(field),
                ts_type
            ));
        }
        body.push_str("}\n");

        let mut content = imports.concat();
        content.push('\n');
        content.push_str(&body);
        Ok(content)
    }
}
