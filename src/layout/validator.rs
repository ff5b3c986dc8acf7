//! Layout specification validation
//!
//! Checks, per node, in order:
//! - `layout` is one of the five layout types
//! - at nesting level >= 3 only `grid` or `vertical`
//! - no wizard in wizard, tabs in tabs, vtabs in vtabs
//! - `options.columns` numeric; `options.tabPosition` a known side (tabs/vtabs)
//! - every `order` entry names a declared property
//! - nested specifications for declared properties, one level down
//! - responsive variants, against the same node
//! - conditional specifications, against the conditional at the same index;
//!   a kind, index or branch-count mismatch is a violation
//!
//! Validation never mutates the specification or the schema, and the
//! outcome is the same however often a specification is validated.

use serde::{Deserialize, Serialize};

use super::errors::{LayoutError, LayoutResult, Violation, ViolationRule};
use super::resolver::MAX_NESTED_LEVEL;
use super::spec::LayoutSpec;
use super::types::{LayoutName, LayoutType, TabPosition};
use crate::schema::SchemaNode;

/// Path of the root node in violation reports
pub const ROOT_PATH: &str = "$root";

/// Whether validation reports every violation or stops at the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Collect every violation
    #[default]
    Collect,
    /// Stop at the first violation
    Strict,
}

/// Validates layout specifications against schema trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutValidator {
    mode: ValidationMode,
}

impl LayoutValidator {
    /// Creates a new validator with the given reporting mode.
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Returns every violation of `spec` against `node` (empty = valid).
    ///
    /// In strict mode at most one violation is returned.
    pub fn validate(
        &self,
        spec: &LayoutSpec,
        node: &SchemaNode,
        level: usize,
        parent: Option<LayoutType>,
    ) -> Vec<Violation> {
        let mut walk = Walk {
            mode: self.mode,
            violations: Vec::new(),
        };
        walk.visit(spec, node, level, parent, ROOT_PATH);
        walk.violations
    }

    /// Like `validate`, but as a `Result`.
    pub fn check(
        &self,
        spec: &LayoutSpec,
        node: &SchemaNode,
        level: usize,
        parent: Option<LayoutType>,
    ) -> LayoutResult<()> {
        match LayoutError::from_violations(self.validate(spec, node, level, parent)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Walk {
    mode: ValidationMode,
    violations: Vec<Violation>,
}

impl Walk {
    fn stopped(&self) -> bool {
        self.mode == ValidationMode::Strict && !self.violations.is_empty()
    }

    fn report(&mut self, rule: ViolationRule, path: &str, message: String) {
        if !self.stopped() {
            self.violations.push(Violation::new(rule, path, message));
        }
    }

    fn visit(
        &mut self,
        spec: &LayoutSpec,
        node: &SchemaNode,
        level: usize,
        parent: Option<LayoutType>,
        path: &str,
    ) {
        self.check_layout(spec, level, parent, path);
        self.check_options(spec, path);
        self.check_order(spec, node, path);
        if self.stopped() {
            return;
        }

        let own_layout = spec.layout_type();

        for (name, child_spec) in spec.properties.iter() {
            if let Some(child) = node.properties.get(name) {
                let child_path = format!("{}.{}", path, name);
                self.visit(child_spec, child, level + 1, own_layout, &child_path);
                if self.stopped() {
                    return;
                }
            }
        }

        for (breakpoint, variant) in &spec.responsive {
            let variant_path = format!("{}@{}", path, breakpoint);
            self.visit(variant, node, level, parent, &variant_path);
            if self.stopped() {
                return;
            }
        }

        for (index, conditional_spec) in spec.conditionals.iter().enumerate() {
            let entry_path = format!("{}.conditionals[{}]", path, index);
            let Some(conditional) = node.conditionals.get(index) else {
                self.report(
                    ViolationRule::UnmatchedConditional,
                    &entry_path,
                    format!(
                        "'{}' specification has no conditional at index {} (node declares {})",
                        conditional_spec.kind,
                        index,
                        node.conditionals.len()
                    ),
                );
                if self.stopped() {
                    return;
                }
                continue;
            };
            if conditional.kind != conditional_spec.kind {
                self.report(
                    ViolationRule::UnmatchedConditional,
                    &entry_path,
                    format!(
                        "'{}' specification does not match the '{}' conditional at index {}",
                        conditional_spec.kind, conditional.kind, index
                    ),
                );
                if self.stopped() {
                    return;
                }
                continue;
            }
            if conditional_spec.specs.len() > conditional.branches.len() {
                self.report(
                    ViolationRule::UnmatchedConditional,
                    &entry_path,
                    format!(
                        "{} specifications for {} '{}' branches",
                        conditional_spec.specs.len(),
                        conditional.branches.len(),
                        conditional.kind
                    ),
                );
                if self.stopped() {
                    return;
                }
            }
            for (i, (branch_spec, branch)) in conditional_spec
                .specs
                .iter()
                .zip(&conditional.branches)
                .enumerate()
            {
                let branch_path = if conditional.kind.is_single() {
                    format!("{}.{}", path, conditional.kind)
                } else {
                    format!("{}.{}[{}]", path, conditional.kind, i)
                };
                self.visit(branch_spec, branch, level + 1, own_layout, &branch_path);
                if self.stopped() {
                    return;
                }
            }
        }
    }

    fn check_layout(
        &mut self,
        spec: &LayoutSpec,
        level: usize,
        parent: Option<LayoutType>,
        path: &str,
    ) {
        let layout = match &spec.layout {
            None => return,
            Some(LayoutName::Unknown(name)) => {
                self.report(
                    ViolationRule::UnknownLayoutType,
                    path,
                    format!(
                        "unknown layout type '{}'; expected one of vertical, grid, tabs, vtabs, wizard",
                        name
                    ),
                );
                return;
            }
            Some(LayoutName::Known(layout)) => *layout,
        };

        if level >= MAX_NESTED_LEVEL && !layout.is_flat() {
            self.report(
                ViolationRule::DepthExceeded,
                path,
                format!(
                    "layout '{}' is not allowed at nesting level {}; use grid or vertical",
                    layout, level
                ),
            );
        }

        match (layout, parent) {
            (LayoutType::Wizard, Some(LayoutType::Wizard)) => self.report(
                ViolationRule::WizardInWizard,
                path,
                "wizard cannot nest in wizard".to_string(),
            ),
            (LayoutType::Tabs, Some(LayoutType::Tabs)) => self.report(
                ViolationRule::TabsInTabs,
                path,
                "tabs cannot nest in tabs; use vtabs".to_string(),
            ),
            (LayoutType::Vtabs, Some(LayoutType::Vtabs)) => self.report(
                ViolationRule::VtabsInVtabs,
                path,
                "vtabs cannot nest in vtabs".to_string(),
            ),
            _ => {}
        }
    }

    fn check_options(&mut self, spec: &LayoutSpec, path: &str) {
        let Some(options) = &spec.options else {
            return;
        };

        if let Some(columns) = options.columns_raw() {
            if !columns.is_number() {
                self.report(
                    ViolationRule::InvalidColumns,
                    path,
                    format!("options.columns must be numeric, found {}", columns),
                );
            }
        }

        let tabbed = matches!(
            spec.layout_type(),
            Some(LayoutType::Tabs) | Some(LayoutType::Vtabs)
        );
        if tabbed {
            if let Some(position) = options.tab_position_raw() {
                let valid = position.as_str().and_then(TabPosition::parse).is_some();
                if !valid {
                    self.report(
                        ViolationRule::InvalidTabPosition,
                        path,
                        format!(
                            "options.tabPosition must be one of top, left, right, bottom, found {}",
                            position
                        ),
                    );
                }
            }
        }
    }

    fn check_order(&mut self, spec: &LayoutSpec, node: &SchemaNode, path: &str) {
        let Some(order) = &spec.order else {
            return;
        };
        for name in order {
            if !node.properties.contains_key(name) {
                self.report(
                    ViolationRule::UnknownOrderProperty,
                    path,
                    format!("order references unknown property '{}'", name),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_spec;
    use crate::layout::LayoutOptions;
    use crate::schema::{Conditional, ConditionalKind, SchemaLoader};
    use serde_json::json;

    fn address_schema() -> SchemaNode {
        SchemaLoader::from_value(&json!({
            "type": "object",
            "properties": {
                "street": {"type": "string"},
                "city": {"type": "string"},
                "geo": {
                    "type": "object",
                    "properties": {
                        "point": {
                            "type": "object",
                            "properties": {
                                "inner": {"type": "object", "properties": {"lat": {"type": "number"}}}
                            }
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn rules(violations: &[Violation]) -> Vec<ViolationRule> {
        violations.iter().map(|v| v.rule).collect()
    }

    #[test]
    fn test_generated_spec_is_valid() {
        let schema = address_schema();
        let spec = generate_spec(&schema, 0, None);
        assert!(LayoutValidator::default().validate(&spec, &schema, 0, None).is_empty());
    }

    #[test]
    fn test_unknown_layout_type() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({"layout": "masonry"})).unwrap();

        let violations = LayoutValidator::default().validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::UnknownLayoutType]);
        assert_eq!(violations[0].path, "$root");
        assert!(violations[0].message.contains("masonry"));
    }

    #[test]
    fn test_depth_limit() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({
            "geo": {"point": {"inner": {"layout": "tabs"}}}
        }))
        .unwrap();

        let violations = LayoutValidator::default().validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::DepthExceeded]);
        assert_eq!(violations[0].path, "$root.geo.point.inner");
    }

    #[test]
    fn test_depth_limit_allows_flat_layouts() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({
            "geo": {"point": {"inner": {"layout": "grid"}}}
        }))
        .unwrap();
        assert!(LayoutValidator::default().validate(&spec, &schema, 0, None).is_empty());
    }

    #[test]
    fn test_nesting_rules() {
        let schema = address_schema();
        let validator = LayoutValidator::default();

        let spec = LayoutSpec::from_value(&json!({"layout": "wizard", "geo": {"layout": "wizard"}}))
            .unwrap();
        let violations = validator.validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::WizardInWizard]);
        assert!(violations[0].message.contains("wizard cannot nest in wizard"));

        let spec =
            LayoutSpec::from_value(&json!({"layout": "tabs", "geo": {"layout": "tabs"}})).unwrap();
        let violations = validator.validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::TabsInTabs]);
        assert!(violations[0].message.contains("use vtabs"));

        let spec =
            LayoutSpec::from_value(&json!({"layout": "vtabs", "geo": {"layout": "vtabs"}})).unwrap();
        assert_eq!(
            rules(&validator.validate(&spec, &schema, 0, None)),
            vec![ViolationRule::VtabsInVtabs]
        );

        let spec =
            LayoutSpec::from_value(&json!({"layout": "tabs", "geo": {"layout": "vtabs"}})).unwrap();
        assert!(validator.validate(&spec, &schema, 0, None).is_empty());
    }

    #[test]
    fn test_parent_from_caller() {
        let schema = address_schema();
        let spec = LayoutSpec::new().with_layout(LayoutType::Wizard);
        let violations =
            LayoutValidator::default().validate(&spec, &schema, 1, Some(LayoutType::Wizard));
        assert_eq!(rules(&violations), vec![ViolationRule::WizardInWizard]);
    }

    #[test]
    fn test_option_checks() {
        let schema = address_schema();
        let validator = LayoutValidator::default();

        let spec = LayoutSpec::new()
            .with_layout(LayoutType::Grid)
            .with_options(LayoutOptions::new().with("columns", "three"));
        assert_eq!(
            rules(&validator.validate(&spec, &schema, 0, None)),
            vec![ViolationRule::InvalidColumns]
        );

        let spec = LayoutSpec::new()
            .with_layout(LayoutType::Vtabs)
            .with_options(LayoutOptions::new().with("tabPosition", "middle"));
        assert_eq!(
            rules(&validator.validate(&spec, &schema, 0, None)),
            vec![ViolationRule::InvalidTabPosition]
        );

        // tabPosition is only meaningful for tabbed layouts.
        let spec = LayoutSpec::new()
            .with_layout(LayoutType::Grid)
            .with_options(LayoutOptions::new().with("tabPosition", "middle"));
        assert!(validator.validate(&spec, &schema, 0, None).is_empty());
    }

    #[test]
    fn test_order_must_name_declared_properties() {
        let schema = address_schema();
        let spec = LayoutSpec::new().with_order(&["city", "country"]);

        let violations = LayoutValidator::default().validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::UnknownOrderProperty]);
        assert!(violations[0].message.contains("country"));
    }

    #[test]
    fn test_keys_for_undeclared_properties_ignored() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({"country": {"layout": "masonry"}})).unwrap();
        assert!(LayoutValidator::default().validate(&spec, &schema, 0, None).is_empty());
    }

    #[test]
    fn test_collect_vs_strict() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({
            "layout": "masonry",
            "order": ["nope"],
            "options": {"columns": false}
        }))
        .unwrap();

        let all = LayoutValidator::new(ValidationMode::Collect).validate(&spec, &schema, 0, None);
        assert_eq!(all.len(), 3);

        let first = LayoutValidator::new(ValidationMode::Strict).validate(&spec, &schema, 0, None);
        assert_eq!(rules(&first), vec![ViolationRule::UnknownLayoutType]);
    }

    #[test]
    fn test_responsive_variants_validated() {
        let schema = address_schema();
        let spec = LayoutSpec::from_value(&json!({
            "layout": "vertical",
            "responsive": {"md": {"layout": "wizard"}}
        }))
        .unwrap();

        let violations =
            LayoutValidator::default().validate(&spec, &schema, 1, Some(LayoutType::Wizard));
        assert_eq!(rules(&violations), vec![ViolationRule::WizardInWizard]);
        assert_eq!(violations[0].path, "$root@md");
    }

    #[test]
    fn test_conditional_specs_validated() {
        let schema = SchemaNode::object("root").with_conditional(Conditional::multi(
            ConditionalKind::OneOf,
            vec![SchemaNode::object("root.oneOf[0]"), SchemaNode::object("root.oneOf[1]")],
        ));
        let spec = LayoutSpec::from_value(&json!({
            "layout": "tabs",
            "conditionals": [{"type": "oneOf", "specs": [{}, {"layout": "tabs"}]}]
        }))
        .unwrap();

        let violations = LayoutValidator::default().validate(&spec, &schema, 0, None);
        assert_eq!(rules(&violations), vec![ViolationRule::TabsInTabs]);
        assert_eq!(violations[0].path, "$root.oneOf[1]");
    }

    #[test]
    fn test_unmatched_conditional_specs_reported() {
        let schema = SchemaNode::object("root")
            .with_conditional(Conditional::single(
                ConditionalKind::If,
                SchemaNode::object("root.if"),
            ))
            .with_conditional(Conditional::multi(
                ConditionalKind::AnyOf,
                vec![SchemaNode::object("root.anyOf[0]")],
            ));
        let spec = LayoutSpec::from_value(&json!({
            "conditionals": [
                {"type": "then", "spec": {"layout": "grid"}},
                {"type": "anyOf", "specs": [{}, {"layout": "grid"}]},
                {"type": "else", "spec": {}}
            ]
        }))
        .unwrap();

        let violations = LayoutValidator::default().validate(&spec, &schema, 0, None);
        assert_eq!(
            rules(&violations),
            vec![ViolationRule::UnmatchedConditional; 3]
        );
        assert_eq!(violations[0].path, "$root.conditionals[0]");
        assert_eq!(violations[1].path, "$root.conditionals[1]");
        assert_eq!(violations[2].path, "$root.conditionals[2]");
        assert_eq!(violations[0].rule.code(), "SF_LAYOUT_UNMATCHED_CONDITIONAL");

        let strict = LayoutValidator::new(ValidationMode::Strict).validate(&spec, &schema, 0, None);
        assert_eq!(strict.len(), 1);
    }

    #[test]
    fn test_check_returns_error() {
        let schema = address_schema();
        let spec = LayoutSpec::new().with_order(&["missing"]);
        let err = LayoutValidator::default()
            .check(&spec, &schema, 0, None)
            .unwrap_err();
        assert_eq!(err.code(), "SF_LAYOUT_SPEC_INVALID");
        assert_eq!(err.violations().len(), 1);
    }
}
