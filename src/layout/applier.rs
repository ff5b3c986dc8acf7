//! Layout specification application
//!
//! The whole specification is validated once up front; on any violation
//! nothing is applied. Merging then builds a fresh tree: the input schema is
//! never modified and the output shares no nodes with it.

use std::collections::HashSet;

use super::errors::LayoutResult;
use super::options::resolve_options;
use super::spec::LayoutSpec;
use super::types::LayoutType;
use super::validator::{LayoutValidator, ValidationMode};
use crate::schema::{OrderedMap, SchemaNode};

/// Validates `spec` against `node`, then returns the annotated copy.
pub fn apply_spec(
    node: &SchemaNode,
    spec: &LayoutSpec,
    level: usize,
    parent: Option<LayoutType>,
    mode: ValidationMode,
) -> LayoutResult<SchemaNode> {
    LayoutValidator::new(mode).check(spec, node, level, parent)?;
    Ok(merge(node, spec))
}

fn merge(node: &SchemaNode, spec: &LayoutSpec) -> SchemaNode {
    let empty = LayoutSpec::new();
    let mut out = node.clone();

    let layout = spec
        .layout_type()
        .or(node.layout)
        .unwrap_or(LayoutType::Vertical);
    out.layout = Some(layout);

    out.layout_options = Some(resolve_options(
        layout,
        spec.options.as_ref().or(node.layout_options.as_ref()),
    ));
    if let Some(class_names) = &spec.class_names {
        out.class_names = Some(class_names.clone());
    }
    for (breakpoint, variant) in &spec.responsive {
        if let Some(variant_layout) = variant.layout_type() {
            out.responsive.insert(breakpoint.clone(), variant_layout);
        }
    }

    out.properties = reorder(&node.properties, spec.order.as_deref())
        .into_iter()
        .map(|(name, child)| {
            let child_spec = spec.properties.get(&name).unwrap_or(&empty);
            let merged = merge(child, child_spec);
            (name, merged)
        })
        .collect();

    if let Some(items) = &node.items {
        let mut merged = merge(items, &empty);
        if let Some(item_layout) = &spec.item_layout {
            match LayoutType::parse(item_layout) {
                // Assigned as-is; nesting rules are not checked for items.
                Some(item_type) => {
                    merged.layout = Some(item_type);
                    merged.layout_options =
                        Some(resolve_options(item_type, merged.layout_options.as_ref()));
                }
                None => merged.item_hint = Some(item_layout.clone()),
            }
        }
        out.items = Some(Box::new(merged));
    }

    for (index, conditional) in out.conditionals.iter_mut().enumerate() {
        let branch_specs = spec
            .conditionals
            .get(index)
            .filter(|c| c.kind == conditional.kind)
            .map(|c| c.specs.as_slice())
            .unwrap_or(&[]);
        for (i, branch) in conditional.branches.iter_mut().enumerate() {
            *branch = merge(branch, branch_specs.get(i).unwrap_or(&empty));
        }
    }

    out
}

/// Properties named in `order` first (unknown names skipped), then the rest
/// in declaration order.
fn reorder<'a>(
    properties: &'a OrderedMap<SchemaNode>,
    order: Option<&[String]>,
) -> Vec<(String, &'a SchemaNode)> {
    let mut result: Vec<(String, &SchemaNode)> = Vec::with_capacity(properties.len());
    let mut placed: HashSet<&str> = HashSet::with_capacity(properties.len());

    if let Some(order) = order {
        for name in order {
            if placed.contains(name.as_str()) {
                continue;
            }
            if let Some(child) = properties.get(name) {
                placed.insert(name.as_str());
                result.push((name.clone(), child));
            }
        }
    }

    for (name, child) in properties.iter() {
        if !placed.contains(name) {
            result.push((name.to_string(), child));
        }
    }

    result
}
