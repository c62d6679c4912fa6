mod doctype;
mod field;
mod registry;
mod types;

pub use doctype::{to_identifier, SchemaDescriptor};
pub use field::FieldDescriptor;
pub use registry::{InMemoryRegistry, SchemaFilter, SchemaRegistry};
pub use types::{FieldKind, NamingRule};
