//! Layout specification inference
//!
//! Walks the schema tree top-down and produces a specification with the
//! same shape. Each child is resolved against the layout its parent just
//! received, so nesting constraints hold by construction (explicit
//! `x-layout` overrides excepted; those are left for the validator).

use super::options::resolve_options;
use super::resolver::resolve_layout;
use super::spec::{ConditionalSpec, LayoutSpec};
use super::types::LayoutType;
use crate::schema::SchemaNode;

/// Generates a layout specification for `node` at `level`.
pub fn generate_spec(node: &SchemaNode, level: usize, parent: Option<LayoutType>) -> LayoutSpec {
    let layout = resolve_layout(node, level, parent);
    let own_layout = layout.known();

    let mut spec = LayoutSpec::new();

    if !node.properties.is_empty() {
        spec.order = Some(node.properties.keys().map(str::to_string).collect());
    }
    spec.description = node.description.clone();

    let options = match own_layout {
        Some(layout_type) => resolve_options(layout_type, node.layout_options.as_ref()),
        None => node.layout_options.clone().unwrap_or_default(),
    };
    if !options.is_empty() {
        spec.options = Some(options);
    }

    for (name, child) in node.properties.iter() {
        spec.properties
            .insert(name, generate_spec(child, level + 1, own_layout));
    }

    if node.is_array() {
        if let Some(items) = &node.items {
            // Item type name, not a layout: the renderer reads it as a content hint.
            spec.item_layout = Some(items.schema_type.as_str().to_string());
        }
    }

    for conditional in &node.conditionals {
        let specs = conditional
            .branches
            .iter()
            .map(|branch| generate_spec(branch, level + 1, own_layout))
            .collect();
        spec.conditionals
            .push(ConditionalSpec::new(conditional.kind, specs));
    }

    spec.layout = Some(layout);
    spec
}
