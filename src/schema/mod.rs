//! Schema Tree Provider
//!
//! Parses JSON Schema documents into an owned `SchemaNode` tree that the
//! layout engine reads. The engine never mutates a provided tree; the
//! applier builds a new one.

mod errors;
mod loader;
mod ordered;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{SchemaLoader, MAX_SCHEMA_DEPTH, ROOT_ID};
pub use ordered::OrderedMap;
pub use types::{Conditional, ConditionalKind, SchemaNode, SchemaType};
