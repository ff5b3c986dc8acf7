//! Layout type selection for a single schema node
//!
//! Rules, first match wins:
//! 1. an explicit `x-layout` is returned verbatim (checked later by the validator)
//! 2. non-object nodes are `vertical`
//! 3. level >= 3: `grid` above 5 properties, else `vertical`; parent rules do not apply
//! 4. parent `wizard` -> `vertical`
//! 5. parent `tabs` -> `vtabs`
//! 6. parent `vtabs` -> `vertical`
//! 7. more than 10 properties: `tabs` if any property is an object, else `grid`
//! 8. more than 5 properties: `grid`
//! 9. otherwise `vertical`

use super::types::{LayoutName, LayoutType};
use crate::schema::SchemaNode;

/// Nesting level from which only flat layouts are allowed
pub const MAX_NESTED_LEVEL: usize = 3;

/// Property count above which a node is laid out as a grid
pub const GRID_THRESHOLD: usize = 5;

/// Property count above which a node is split into tabs
pub const TABS_THRESHOLD: usize = 10;

/// Picks the layout for `node` at `level`, given the layout its parent resolved to.
pub fn resolve_layout(node: &SchemaNode, level: usize, parent: Option<LayoutType>) -> LayoutName {
    if let Some(explicit) = &node.x_layout {
        return explicit.clone();
    }
    LayoutName::Known(infer_layout(node, level, parent))
}

fn infer_layout(node: &SchemaNode, level: usize, parent: Option<LayoutType>) -> LayoutType {
    if !node.is_object() {
        return LayoutType::Vertical;
    }

    let count = node.property_count();

    if level >= MAX_NESTED_LEVEL {
        return if count > GRID_THRESHOLD {
            LayoutType::Grid
        } else {
            LayoutType::Vertical
        };
    }

    match parent {
        Some(LayoutType::Wizard) => return LayoutType::Vertical,
        Some(LayoutType::Tabs) => return LayoutType::Vtabs,
        Some(LayoutType::Vtabs) => return LayoutType::Vertical,
        _ => {}
    }

    if count > TABS_THRESHOLD {
        if node.has_object_property() {
            LayoutType::Tabs
        } else {
            LayoutType::Grid
        }
    } else if count > GRID_THRESHOLD {
        LayoutType::Grid
    } else {
        LayoutType::Vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;

    fn object_with(count: usize, objects: usize) -> SchemaNode {
        let mut node = SchemaNode::object("root");
        for i in 0..count {
            let id = format!("root.f{}", i);
            let child = if i < objects {
                SchemaNode::object(id)
            } else {
                SchemaNode::string(id)
            };
            node = node.with_property(format!("f{}", i), child);
        }
        node
    }

    fn resolve(node: &SchemaNode, level: usize, parent: Option<LayoutType>) -> LayoutType {
        resolve_layout(node, level, parent).known().unwrap()
    }

    #[test]
    fn test_explicit_layout_wins_verbatim() {
        let node = object_with(2, 0).with_x_layout("wizard");
        assert!(resolve_layout(&node, 5, Some(LayoutType::Wizard)).is(LayoutType::Wizard));

        let node = object_with(2, 0).with_x_layout("masonry");
        assert_eq!(
            resolve_layout(&node, 0, None),
            LayoutName::Unknown("masonry".into())
        );
    }

    #[test]
    fn test_non_object_is_vertical() {
        let leaf = SchemaNode::string("root.name");
        assert_eq!(resolve(&leaf, 0, Some(LayoutType::Tabs)), LayoutType::Vertical);
    }

    #[test]
    fn test_deep_nodes_flat() {
        assert_eq!(resolve(&object_with(6, 0), 3, None), LayoutType::Grid);
        assert_eq!(resolve(&object_with(4, 0), 3, None), LayoutType::Vertical);
        assert_eq!(resolve(&object_with(12, 4), 4, None), LayoutType::Grid);
    }

    #[test]
    fn test_depth_rule_precedes_parent_rules() {
        assert_eq!(
            resolve(&object_with(6, 0), 3, Some(LayoutType::Tabs)),
            LayoutType::Grid
        );
    }

    #[test]
    fn test_parent_rules() {
        let node = object_with(12, 3);
        assert_eq!(resolve(&node, 1, Some(LayoutType::Wizard)), LayoutType::Vertical);
        assert_eq!(resolve(&node, 1, Some(LayoutType::Tabs)), LayoutType::Vtabs);
        assert_eq!(resolve(&node, 1, Some(LayoutType::Vtabs)), LayoutType::Vertical);
    }

    #[test]
    fn test_property_count_rules() {
        assert_eq!(resolve(&object_with(12, 3), 0, None), LayoutType::Tabs);
        assert_eq!(resolve(&object_with(12, 0), 0, None), LayoutType::Grid);
        assert_eq!(resolve(&object_with(11, 1), 0, None), LayoutType::Tabs);
        assert_eq!(resolve(&object_with(10, 2), 0, None), LayoutType::Grid);
        assert_eq!(resolve(&object_with(6, 0), 1, Some(LayoutType::Grid)), LayoutType::Grid);
        assert_eq!(resolve(&object_with(5, 0), 0, None), LayoutType::Vertical);
    }
}
