pub mod loader;
pub mod typescript;

pub use loader::{load_app, load_bench, LoadSummary};
pub use typescript::{
    Error, GenerationOutcome, GeneratorOptions, OutputLocation, PassReport, TypeGenerator,
};
