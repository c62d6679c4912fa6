//! TypeScript code generator for DocType schemas.
//!
//! Generates one interface file per DocType, a `DocTypeMap` per output tree
//! and optional `index.ts` barrels.

mod compiler;
mod doctype_map;
mod field_type;
mod generator;
mod index;
mod pass;
mod paths;
mod reference;
mod renderer;

pub use compiler::{CompileOptions, SchemaCompiler};
pub use doctype_map::{render_doctype_map, write_doctype_map, write_doctype_maps, DOCTYPE_MAP_NAME};
pub use field_type::{map_field_type, optional_marker, select_union, ANY_TYPE};
pub use generator::{GenerationOutcome, GeneratorOptions, PassReport, SchemaOutcome, TypeGenerator};
pub use index::write_indexes;
pub use pass::{GeneratedTypeRecord, GenerationPass, GenerationState};
pub use paths::{resolve_output, OutputLocation};
pub use renderer::field_comment;

use doctype_ts_core::DoctypeError;

/// Code generation error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] DoctypeError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Circular child table reference: {chain}")]
    Cycle { chain: String },

    #[error("Type name {identifier} for {incoming} is already used by {existing}")]
    IdentifierCollision {
        identifier: String,
        existing: String,
        incoming: String,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
