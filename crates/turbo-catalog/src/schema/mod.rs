//! Category attribute schema.

mod definition;
mod resolver;

pub use definition::{AttributeDefinition, AttributeOption, DataType};
pub use resolver::{build_definitions, ResolveOutcome, SchemaRequest, SchemaResolver};
