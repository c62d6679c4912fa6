use serde::{Deserialize, Serialize};

use super::field::FieldDescriptor;
use super::types::NamingRule;

/// Immutable snapshot of a DocType definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Schema name, unique within a registry (may contain spaces).
    pub name: String,

    /// Owning module display name.
    pub module: String,

    /// Owning application, when the source knows it.
    pub app: Option<String>,

    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,

    /// Naming rule for record names.
    pub naming_rule: NamingRule,

    /// Virtual (computed, not stored) schema.
    pub is_virtual: bool,

    /// Schema defined through the UI rather than shipped in an app.
    pub is_custom: bool,

    /// Child table schema.
    pub is_table: bool,
}

impl SchemaDescriptor {
    /// Create a new schema definition.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            app: None,
            fields: Vec::new(),
            naming_rule: NamingRule::default(),
            is_virtual: false,
            is_custom: false,
            is_table: false,
        }
    }

    /// Set the owning application.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the naming rule.
    pub fn with_naming_rule(mut self, naming_rule: NamingRule) -> Self {
        self.naming_rule = naming_rule;
        self
    }

    /// Mark as a child table schema.
    pub fn table(mut self) -> Self {
        self.is_table = true;
        self
    }

    /// Mark as a virtual schema.
    pub fn virtual_schema(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Mark as a custom (UI-defined) schema.
    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    /// TypeScript identifier derived from the schema name.
    pub fn type_name(&self) -> String {
        to_identifier(&self.name)
    }

    /// Directory identifier derived from the module name.
    pub fn module_dir(&self) -> String {
        to_identifier(&self.module)
    }

    /// Fields to emit, optionally including custom field fixtures.
    pub fn fields_for(&self, include_custom_fields: bool) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(move |f| include_custom_fields || !f.is_custom_field)
    }
}

/// Derive a code-safe identifier by stripping all whitespace.
///
/// Not injective: `"Sales Order"` and `"SalesOrder"` collide.
pub fn to_identifier(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::FieldKind;

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("Sales Order Item"), "SalesOrderItem");
        assert_eq!(to_identifier("Note"), "Note");
        assert_eq!(to_identifier(" Tab\tSeparated "), "TabSeparated");
    }

    #[test]
    fn test_schema_identifiers() {
        let schema = SchemaDescriptor::new("Library Member", "Library Management");
        assert_eq!(schema.type_name(), "LibraryMember");
        assert_eq!(schema.module_dir(), "LibraryManagement");
    }

    #[test]
    fn test_fields_for_filters_custom_fields() {
        let schema = SchemaDescriptor::new("Customer", "Selling")
            .with_field(FieldDescriptor::new("customer_name", FieldKind::Data))
            .with_field(FieldDescriptor::new("loyalty_tier", FieldKind::Data).custom());

        assert_eq!(schema.fields_for(false).count(), 1);
        assert_eq!(schema.fields_for(true).count(), 2);
    }
}
