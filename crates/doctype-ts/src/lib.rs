//! doctype-ts - TypeScript interfaces for DocType schemas
//!
//! Generates one interface file per DocType, colocated by module, together
//! with a `DocTypeMap` that maps schema names to their generated types.

#[doc(hidden)]
pub use doctype_ts_codegen;
#[doc(hidden)]
pub use doctype_ts_core;

pub use doctype_ts_codegen::typescript::{
    write_doctype_maps, write_indexes, GeneratedTypeRecord, SchemaOutcome,
};
pub use doctype_ts_codegen::{
    load_app, load_bench, Error, GenerationOutcome, GeneratorOptions, LoadSummary,
    OutputLocation, PassReport, TypeGenerator,
};
pub use doctype_ts_core::{
    AppTypeSetting, ConfigFile, DoctypeTsConfig, EnvironmentProvider, FieldDescriptor, FieldKind,
    GenerationSettings, InMemoryRegistry, NamingRule, SchemaDescriptor, SchemaFilter,
    SchemaRegistry, SettingsProvider, SiteEnvironment,
};
