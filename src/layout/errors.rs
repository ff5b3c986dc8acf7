//! Layout specification errors
//!
//! Violation rules:
//! - SF_LAYOUT_UNKNOWN_TYPE
//! - SF_LAYOUT_DEPTH_EXCEEDED
//! - SF_LAYOUT_WIZARD_IN_WIZARD
//! - SF_LAYOUT_TABS_IN_TABS
//! - SF_LAYOUT_VTABS_IN_VTABS
//! - SF_LAYOUT_INVALID_COLUMNS
//! - SF_LAYOUT_INVALID_TAB_POSITION
//! - SF_LAYOUT_UNKNOWN_ORDER_PROPERTY
//!
//! A specification that breaks any rule is rejected as a whole. Nothing is
//! auto-corrected.
//!
//! `SpecDocumentError` (SF_SPEC_MALFORMED) is different: the document could
//! not be read as a specification at all.

use std::fmt;

use serde::{Serialize, Serializer};

/// The rule a specification broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationRule {
    /// `layout` is not one of the five layout types
    UnknownLayoutType,
    /// tabs/vtabs/wizard at nesting level 3 or deeper
    DepthExceeded,
    /// wizard directly inside wizard
    WizardInWizard,
    /// tabs directly inside tabs
    TabsInTabs,
    /// vtabs directly inside vtabs
    VtabsInVtabs,
    /// `options.columns` is not numeric
    InvalidColumns,
    /// `options.tabPosition` is not top/left/right/bottom
    InvalidTabPosition,
    /// `order` names a property the node does not declare
    UnknownOrderProperty,
    /// a conditional specification has no same-kind conditional at its index
    UnmatchedConditional,
}

impl ViolationRule {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationRule::UnknownLayoutType => "SF_LAYOUT_UNKNOWN_TYPE",
            ViolationRule::DepthExceeded => "SF_LAYOUT_DEPTH_EXCEEDED",
            ViolationRule::WizardInWizard => "SF_LAYOUT_WIZARD_IN_WIZARD",
            ViolationRule::TabsInTabs => "SF_LAYOUT_TABS_IN_TABS",
            ViolationRule::VtabsInVtabs => "SF_LAYOUT_VTABS_IN_VTABS",
            ViolationRule::InvalidColumns => "SF_LAYOUT_INVALID_COLUMNS",
            ViolationRule::InvalidTabPosition => "SF_LAYOUT_INVALID_TAB_POSITION",
            ViolationRule::UnknownOrderProperty => "SF_LAYOUT_UNKNOWN_ORDER_PROPERTY",
            ViolationRule::UnmatchedConditional => "SF_LAYOUT_UNMATCHED_CONDITIONAL",
        }
    }
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ViolationRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One broken rule at one schema path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: ViolationRule,
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: ViolationRule, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': {}", self.rule.code(), self.path, self.message)
    }
}

/// A rejected layout specification.
///
/// Always carries at least one violation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutError {
    violations: Vec<Violation>,
}

impl LayoutError {
    pub const CODE: &'static str = "SF_LAYOUT_SPEC_INVALID";

    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn code(&self) -> &'static str {
        Self::CODE
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// The first violation found, in traversal order
    pub fn first(&self) -> &Violation {
        &self.violations[0]
    }

    pub fn message(&self) -> String {
        match self.violations.len() {
            1 => self.violations[0].to_string(),
            n => format!("{} (and {} more)", self.violations[0], n - 1),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", Self::CODE, self.message())
    }
}

impl std::error::Error for LayoutError {}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A document that cannot be read as a layout specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocumentError {
    path: String,
    message: String,
}

impl SpecDocumentError {
    pub const CODE: &'static str = "SF_SPEC_MALFORMED";

    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SpecDocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: at '{}': {}", Self::CODE, self.path, self.message)
    }
}

impl std::error::Error for SpecDocumentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_codes() {
        assert_eq!(ViolationRule::TabsInTabs.code(), "SF_LAYOUT_TABS_IN_TABS");
        assert_eq!(
            ViolationRule::UnknownOrderProperty.code(),
            "SF_LAYOUT_UNKNOWN_ORDER_PROPERTY"
        );
    }

    #[test]
    fn test_empty_violations_are_not_an_error() {
        assert!(LayoutError::from_violations(vec![]).is_none());
    }

    #[test]
    fn test_message_counts_extra_violations() {
        let err = LayoutError::from_violations(vec![
            Violation::new(ViolationRule::InvalidColumns, "$root", "columns must be numeric"),
            Violation::new(ViolationRule::DepthExceeded, "$root.a.b.c", "too deep"),
        ])
        .unwrap();

        let display = err.to_string();
        assert!(display.starts_with("SF_LAYOUT_SPEC_INVALID"));
        assert!(display.contains("SF_LAYOUT_INVALID_COLUMNS"));
        assert!(display.contains("and 1 more"));
        assert_eq!(err.first().rule, ViolationRule::InvalidColumns);
    }

    #[test]
    fn test_violation_serializes_rule_code() {
        let v = Violation::new(ViolationRule::WizardInWizard, "$root.step", "nested wizard");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["rule"], "SF_LAYOUT_WIZARD_IN_WIZARD");
        assert_eq!(json["path"], "$root.step");
    }
}
