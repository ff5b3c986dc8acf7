//! schemaform - JSON Schema to HTML forms through layout specifications
//!
//! A layout specification mirrors the schema tree and says how each object
//! is arranged: vertical, grid, tabs, vtabs or wizard. Specifications are
//! inferred from the schema, validated against the nesting rules and applied
//! to produce an annotated tree, which the renderer turns into a page.

pub mod batch;
pub mod cli;
pub mod http_server;
pub mod layout;
pub mod observability;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod store;
