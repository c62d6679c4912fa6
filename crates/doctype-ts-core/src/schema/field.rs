use serde::{Deserialize, Serialize};

use super::types::FieldKind;

/// Definition of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field identifier (snake_case).
    pub fieldname: String,

    /// Field kind.
    pub fieldtype: FieldKind,

    /// Display label.
    pub label: Option<String>,

    /// Help text.
    pub description: Option<String>,

    /// Choices for `Select` (newline-delimited) or the referenced schema
    /// name for `Link` and table kinds.
    pub options: String,

    /// Whether a value is mandatory.
    pub required: bool,

    /// Whether the field comes from a custom field fixture rather than the
    /// schema definition itself.
    pub is_custom_field: bool,
}

impl FieldDescriptor {
    /// Create a new field definition.
    pub fn new(fieldname: impl Into<String>, fieldtype: FieldKind) -> Self {
        Self {
            fieldname: fieldname.into(),
            fieldtype,
            label: None,
            description: None,
            options: String::new(),
            required: false,
            is_custom_field: false,
        }
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the options string.
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    /// Mark the field as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as contributed by a custom field fixture.
    pub fn custom(mut self) -> Self {
        self.is_custom_field = true;
        self
    }

    /// Whether the field carries data (i.e. is not a layout element).
    pub fn has_data(&self) -> bool {
        !self.fieldtype.is_layout()
    }

    /// Name of the schema this field points at, if any.
    pub fn referenced_schema(&self) -> Option<&str> {
        if self.fieldtype.references_schema() && !self.options.is_empty() {
            Some(&self.options)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_defaults() {
        let field = FieldDescriptor::new("title", FieldKind::Data);
        assert_eq!(field.fieldname, "title");
        assert!(!field.required);
        assert!(!field.is_custom_field);
        assert!(field.label.is_none());
        assert!(field.has_data());
    }

    #[test]
    fn test_field_builder() {
        let field = FieldDescriptor::new("items", FieldKind::Table)
            .with_label("Items")
            .with_options("Sales Item")
            .required();
        assert!(field.required);
        assert_eq!(field.referenced_schema(), Some("Sales Item"));
    }

    #[test]
    fn test_select_has_no_reference() {
        let field = FieldDescriptor::new("status", FieldKind::Select).with_options("Open\nClosed");
        assert_eq!(field.referenced_schema(), None);
    }

    #[test]
    fn test_layout_field_has_no_data() {
        let field = FieldDescriptor::new("sb_1", FieldKind::SectionBreak);
        assert!(!field.has_data());
    }
}
