//! Core types for doctype-ts: schema descriptors, the registry seam,
//! settings and environment configuration.

pub mod config;
pub mod error;
pub mod schema;

pub use config::{
    AppTypeSetting, ConfigFile, DoctypeTsConfig, EnvironmentProvider, GenerationSettings,
    SettingsProvider, SiteEnvironment,
};
pub use error::{DoctypeError, Result};
pub use schema::{
    FieldDescriptor, FieldKind, InMemoryRegistry, NamingRule, SchemaDescriptor, SchemaFilter,
    SchemaRegistry,
};
