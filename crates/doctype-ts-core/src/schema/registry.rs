use std::collections::HashMap;
use std::sync::RwLock;

use super::doctype::SchemaDescriptor;
use super::field::FieldDescriptor;
use crate::error::{DoctypeError, Result};

/// Filter for [`SchemaRegistry::list_schemas`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFilter {
    /// Only schemas in this module.
    pub module: Option<String>,
    /// Only child tables (`Some(true)`) or only non-tables (`Some(false)`).
    pub is_table: Option<bool>,
}

impl SchemaFilter {
    /// Schemas of a module, restricted by table flag.
    pub fn module(module: impl Into<String>, is_table: bool) -> Self {
        Self {
            module: Some(module.into()),
            is_table: Some(is_table),
        }
    }

    fn matches(&self, schema: &SchemaDescriptor) -> bool {
        self.module.as_deref().map_or(true, |m| m == schema.module)
            && self.is_table.map_or(true, |t| t == schema.is_table)
    }
}

/// Read access to the framework's schema metadata.
pub trait SchemaRegistry: Send + Sync {
    /// Fetch a schema by name.
    fn get_schema(&self, name: &str) -> Result<Option<SchemaDescriptor>>;

    /// Names of schemas matching the filter, in registry order.
    fn list_schemas(&self, filter: &SchemaFilter) -> Result<Vec<String>>;

    /// Module names belonging to an application.
    fn list_modules(&self, app: &str) -> Result<Vec<String>>;

    /// Application owning a module.
    fn module_app(&self, module: &str) -> Result<Option<String>>;
}

#[derive(Default)]
struct Inner {
    schemas: HashMap<String, SchemaDescriptor>,
    order: Vec<String>,
    modules: Vec<(String, String)>,
}

/// Registry held in memory, populated by a loader or by tests.
pub struct InMemoryRegistry {
    inner: RwLock<Inner>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Register (or replace) a schema definition.
    pub fn register_schema(&self, schema: SchemaDescriptor) -> Result<()> {
        let mut inner = self.write()?;
        if let Some(app) = schema.app.clone() {
            register_module_locked(&mut inner, &app, &schema.module);
        }
        if !inner.schemas.contains_key(&schema.name) {
            inner.order.push(schema.name.clone());
        }
        inner.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Register a module as belonging to an application.
    pub fn register_module(&self, app: &str, module: &str) -> Result<()> {
        let mut inner = self.write()?;
        register_module_locked(&mut inner, app, module);
        Ok(())
    }

    /// Append a custom field to an already registered schema.
    pub fn add_custom_field(&self, schema: &str, field: FieldDescriptor) -> Result<()> {
        self.insert_custom_field(schema, field, None)
    }

    /// Attach a custom field after the field named `insert_after`.
    ///
    /// Custom fields already placed behind the same anchor keep their
    /// position ahead of the new one. Without a matching anchor the field
    /// is appended.
    pub fn insert_custom_field(
        &self,
        schema: &str,
        field: FieldDescriptor,
        insert_after: Option<&str>,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let target = inner
            .schemas
            .get_mut(schema)
            .ok_or_else(|| DoctypeError::NotFound(format!("DocType {}", schema)))?;

        let anchor = insert_after
            .filter(|name| !name.is_empty())
            .and_then(|name| target.fields.iter().position(|f| f.fieldname == name));
        let index = match anchor {
            Some(anchor) => {
                let mut index = anchor + 1;
                while target
                    .fields
                    .get(index)
                    .is_some_and(|f| f.is_custom_field)
                {
                    index += 1;
                }
                index
            }
            None => target.fields.len(),
        };
        target.fields.insert(index, field.custom());
        Ok(())
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.order.len()).unwrap_or(0)
    }

    /// Whether no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| DoctypeError::Registry("registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| DoctypeError::Registry("registry lock poisoned".to_string()))
    }
}

fn register_module_locked(inner: &mut Inner, app: &str, module: &str) {
    if !inner.modules.iter().any(|(_, m)| m == module) {
        inner.modules.push((app.to_string(), module.to_string()));
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry for InMemoryRegistry {
    fn get_schema(&self, name: &str) -> Result<Option<SchemaDescriptor>> {
        Ok(self.read()?.schemas.get(name).cloned())
    }

    fn list_schemas(&self, filter: &SchemaFilter) -> Result<Vec<String>> {
        let inner = self.read()?;
        Ok(inner
            .order
            .iter()
            .filter(|name| inner.schemas.get(*name).is_some_and(|s| filter.matches(s)))
            .cloned()
            .collect())
    }

    fn list_modules(&self, app: &str) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .modules
            .iter()
            .filter(|(a, _)| a == app)
            .map(|(_, m)| m.clone())
            .collect())
    }

    fn module_app(&self, module: &str) -> Result<Option<String>> {
        Ok(self
            .read()?
            .modules
            .iter()
            .find(|(_, m)| m == module)
            .map(|(a, _)| a.clone()))
    }
}
