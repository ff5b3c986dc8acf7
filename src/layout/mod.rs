//! Layout Specification Engine
//!
//! Infers a layout specification for a schema tree, validates any
//! specification (inferred or hand-written) against the nesting rules, and
//! applies a valid specification onto a fresh copy of the tree.
//!
//! Nesting levels count from 0 at the root. Rules enforced:
//! - at level 3 and deeper only `grid` and `vertical`
//! - no wizard directly in wizard, tabs in tabs, or vtabs in vtabs
//!
//! The engine holds no state between calls.

mod applier;
mod errors;
mod generator;
mod options;
mod resolver;
mod spec;
mod types;
mod validator;

pub use applier::apply_spec;
pub use errors::{LayoutError, LayoutResult, SpecDocumentError, Violation, ViolationRule};
pub use generator::generate_spec;
pub use options::{resolve_options, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_GAP};
pub use resolver::{resolve_layout, GRID_THRESHOLD, MAX_NESTED_LEVEL, TABS_THRESHOLD};
pub use spec::{is_reserved_key, ConditionalSpec, LayoutSpec, RESERVED_KEYS};
pub use types::{option_keys, LayoutName, LayoutOptions, LayoutType, TabPosition};
pub use validator::{LayoutValidator, ValidationMode, ROOT_PATH};

use crate::schema::SchemaNode;

/// Entry point for whole-tree operations, starting at the root (level 0, no parent).
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    mode: ValidationMode,
}

impl LayoutEngine {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Infers a specification for the whole tree.
    pub fn generate(&self, schema: &SchemaNode) -> LayoutSpec {
        generate_spec(schema, 0, None)
    }

    /// Returns the violations of `spec` against `schema` (empty = valid).
    pub fn validate(&self, spec: &LayoutSpec, schema: &SchemaNode) -> Vec<Violation> {
        LayoutValidator::new(self.mode).validate(spec, schema, 0, None)
    }

    /// Validates, then applies `spec` onto a copy of `schema`.
    pub fn apply(&self, schema: &SchemaNode, spec: &LayoutSpec) -> LayoutResult<SchemaNode> {
        apply_spec(schema, spec, 0, None, self.mode)
    }

    /// Infers a specification and applies it, returning both.
    pub fn generate_and_apply(&self, schema: &SchemaNode) -> LayoutResult<(LayoutSpec, SchemaNode)> {
        let spec = self.generate(schema);
        let tree = self.apply(schema, &spec)?;
        Ok((spec, tree))
    }
}
