use doctype_ts_core::{FieldDescriptor, FieldKind, SchemaDescriptor};

use super::compiler::SchemaCompiler;
use super::paths::OutputLocation;
use super::Error;

/// Fallback for kinds without a mapping and unresolved references.
pub const ANY_TYPE: &str = "any";

/// TypeScript type of a field that needs no registry lookup.
///
/// Returns `None` for table kinds, which are resolved against the registry.
pub fn map_field_type(field: &FieldDescriptor) -> Option<String> {
    match &field.fieldtype {
        kind if kind.is_table() => None,
        FieldKind::Select => Some(select_union(&field.options)),
        kind => Some(kind.to_typescript().unwrap_or(ANY_TYPE).to_string()),
    }
}

/// Literal union of newline-separated choices, in the given order.
pub fn select_union(options: &str) -> String {
    if options.is_empty() {
        return "string".to_string();
    }
    options
        .split('\n')
        .map(string_literal)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Double-quoted TypeScript string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `?` for optional fields, nothing for mandatory ones.
pub fn optional_marker(field: &FieldDescriptor) -> &'static str {
    if field.required {
        ""
    } else {
        "?"
    }
}

impl SchemaCompiler<'_> {
    /// Type expression and optional import statement for a field.
    pub fn field_type(
        &mut self,
        field: &FieldDescriptor,
        owner: &SchemaDescriptor,
        location: &OutputLocation,
    ) -> Result<(String, Option<String>), Error> {
        match map_field_type(field) {
            Some(ts_type) => Ok((ts_type, None)),
            None => self.resolve_table_field(field, owner, location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: &str) -> FieldDescriptor {
        FieldDescriptor::new("f", FieldKind::parse(kind))
    }

    #[test]
    fn test_lookup_table() {
        let strings = [
            "Data",
            "Small Text",
            "Text Editor",
            "Text",
            "Code",
            "Link",
            "Dynamic Link",
            "Read Only",
            "Password",
            "Attach Image",
            "Attach",
            "HTML Editor",
            "Image",
            "Duration",
            "Date",
            "Datetime",
            "Time",
            "Phone",
            "Color",
            "Long Text",
            "Markdown Editor",
        ];
        for kind in strings {
            assert_eq!(map_field_type(&field(kind)).as_deref(), Some("string"), "{kind}");
        }
        for kind in ["Int", "Float", "Currency", "Percent"] {
            assert_eq!(map_field_type(&field(kind)).as_deref(), Some("number"), "{kind}");
        }
        assert_eq!(map_field_type(&field("Check")).as_deref(), Some("0 | 1"));
    }

    #[test]
    fn test_unknown_kinds_fall_back_to_any() {
        for kind in ["Geolocation", "Rating", "JSON", "Signature", "Autocomplete"] {
            assert_eq!(map_field_type(&field(kind)).as_deref(), Some(ANY_TYPE), "{kind}");
        }
    }

    #[test]
    fn test_table_kinds_need_resolution() {
        assert_eq!(map_field_type(&field("Table")), None);
        assert_eq!(map_field_type(&field("Table MultiSelect")), None);
    }

    #[test]
    fn test_select_union_keeps_order() {
        let select = field("Select").with_options("C\nA\nB");
        assert_eq!(map_field_type(&select).as_deref(), Some("\"C\" | \"A\" | \"B\""));
    }

    #[test]
    fn test_select_without_options_is_string() {
        assert_eq!(map_field_type(&field("Select")).as_deref(), Some("string"));
        assert_eq!(select_union(""), "string");
    }

    #[test]
    fn test_select_single_option() {
        assert_eq!(select_union("Only"), "\"Only\"");
    }

    #[test]
    fn test_select_options_are_escaped() {
        assert_eq!(
            select_union("Say \"hi\"\nC:\\temp"),
            r#""Say \"hi\"" | "C:\\temp""#
        );
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("Sales Order"), "\"Sales Order\"");
        assert_eq!(string_literal("a\r"), r#""a\r""#);
    }

    #[test]
    fn test_optional_marker() {
        assert_eq!(optional_marker(&field("Data")), "?");
        assert_eq!(optional_marker(&field("Data").required()), "");
    }
}
