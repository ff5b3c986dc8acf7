//! Layout specification documents
//!
//! On the wire a specification is a JSON object mirroring the schema: a
//! fixed set of reserved directive keys, and every other object-valued key
//! is the nested specification for the property of that name.
//!
//! In memory the two are kept apart (`LayoutSpec::properties`), so a
//! property literally named `layout` or `order` can still carry a nested
//! specification. Such entries cannot be expressed in the document format
//! and are left out when serializing.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::SpecDocumentError;
use super::types::{LayoutName, LayoutOptions, LayoutType};
use crate::schema::{ConditionalKind, OrderedMap};

/// Keys with a fixed meaning in a specification document.
pub const RESERVED_KEYS: [&str; 12] = [
    "layout",
    "order",
    "options",
    "description",
    "classNames",
    "responsive",
    "conditionals",
    "itemLayout",
    "additionalProperties",
    "readOnly",
    "writeOnly",
    "default",
];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

const BREAKPOINT_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

static BREAKPOINT_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Breakpoint names end up in attribute names, so they are limited to
/// `[A-Za-z0-9_-]`.
pub fn is_valid_breakpoint(name: &str) -> bool {
    BREAKPOINT_RE
        .get_or_init(|| Regex::new(BREAKPOINT_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Layout specification for one schema node and, recursively, its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct LayoutSpec {
    pub layout: Option<LayoutName>,
    pub order: Option<Vec<String>>,
    pub description: Option<String>,
    /// Space-separated CSS classes
    pub class_names: Option<String>,
    pub options: Option<LayoutOptions>,
    /// Breakpoint name to alternative specification
    pub responsive: BTreeMap<String, LayoutSpec>,
    pub conditionals: Vec<ConditionalSpec>,
    /// Content-type hint for array items (a schema type name, or a layout)
    pub item_layout: Option<String>,
    /// Nested specifications by property name
    pub properties: OrderedMap<LayoutSpec>,
    /// Reserved-but-inert keys and non-object unknown keys, kept for round trips
    pub passthrough: Map<String, Value>,
}

impl LayoutSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: impl Into<LayoutName>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.order = Some(order.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, spec: LayoutSpec) -> Self {
        self.properties.insert(name, spec);
        self
    }

    pub fn with_item_layout(mut self, item_layout: impl Into<String>) -> Self {
        self.item_layout = Some(item_layout.into());
        self
    }

    /// The declared layout, when it is a valid layout type
    pub fn layout_type(&self) -> Option<LayoutType> {
        self.layout.as_ref().and_then(LayoutName::known)
    }

    pub fn property(&self, name: &str) -> Option<&LayoutSpec> {
        self.properties.get(name)
    }

    /// Parses a specification document.
    pub fn from_value(value: &Value) -> Result<Self, SpecDocumentError> {
        parse_spec(value, "$root")
    }

    /// Parses specification text.
    pub fn from_json(content: &str) -> Result<Self, SpecDocumentError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| SpecDocumentError::new("$root", format!("invalid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Serializes to the document format.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();

        if let Some(layout) = &self.layout {
            out.insert("layout".into(), Value::String(layout.as_str().to_string()));
        }
        if let Some(order) = &self.order {
            out.insert(
                "order".into(),
                Value::Array(order.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(class_names) = &self.class_names {
            out.insert("classNames".into(), Value::String(class_names.clone()));
        }
        if let Some(options) = &self.options {
            out.insert("options".into(), Value::Object(options.as_map().clone()));
        }
        if !self.responsive.is_empty() {
            let variants = self
                .responsive
                .iter()
                .map(|(bp, spec)| (bp.clone(), spec.to_value()))
                .collect();
            out.insert("responsive".into(), Value::Object(variants));
        }
        if !self.conditionals.is_empty() {
            out.insert(
                "conditionals".into(),
                Value::Array(self.conditionals.iter().map(ConditionalSpec::to_value).collect()),
            );
        }
        if let Some(item_layout) = &self.item_layout {
            out.insert("itemLayout".into(), Value::String(item_layout.clone()));
        }
        for (name, child) in self.properties.iter() {
            if !is_reserved_key(name) {
                out.insert(name.to_string(), child.to_value());
            }
        }
        for (key, value) in &self.passthrough {
            if !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }

        Value::Object(out)
    }
}

impl TryFrom<Value> for LayoutSpec {
    type Error = SpecDocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        LayoutSpec::from_value(&value)
    }
}

impl From<LayoutSpec> for Value {
    fn from(spec: LayoutSpec) -> Self {
        spec.to_value()
    }
}

/// Layout specifications for one conditional directive's sub-schemas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ConditionalSpec {
    pub kind: ConditionalKind,
    /// One entry for if/then/else, one per sub-schema otherwise
    pub specs: Vec<LayoutSpec>,
}

impl ConditionalSpec {
    pub fn new(kind: ConditionalKind, specs: Vec<LayoutSpec>) -> Self {
        Self { kind, specs }
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::String(self.kind.keyword().to_string()));
        if self.kind.is_single() {
            if let Some(spec) = self.specs.first() {
                out.insert("spec".into(), spec.to_value());
            }
        } else {
            out.insert(
                "specs".into(),
                Value::Array(self.specs.iter().map(LayoutSpec::to_value).collect()),
            );
        }
        Value::Object(out)
    }
}

impl TryFrom<Value> for ConditionalSpec {
    type Error = SpecDocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        parse_conditional(&value, "$root.conditionals")
    }
}

impl From<ConditionalSpec> for Value {
    fn from(spec: ConditionalSpec) -> Self {
        spec.to_value()
    }
}

fn parse_spec(value: &Value, path: &str) -> Result<LayoutSpec, SpecDocumentError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SpecDocumentError::new(path, "specification must be a JSON object"))?;

    let mut spec = LayoutSpec::new();
    for (key, value) in obj {
        let key_path = format!("{}.{}", path, key);
        match key.as_str() {
            "layout" => {
                let name = value
                    .as_str()
                    .ok_or_else(|| SpecDocumentError::new(&key_path, "layout must be a string"))?;
                spec.layout = Some(LayoutName::from(name));
            }
            "order" => spec.order = Some(parse_string_list(value, &key_path)?),
            "description" => {
                let text = value.as_str().ok_or_else(|| {
                    SpecDocumentError::new(&key_path, "description must be a string")
                })?;
                spec.description = Some(text.to_string());
            }
            "classNames" => {
                let classes = match value {
                    Value::String(s) => s.clone(),
                    other => parse_string_list(other, &key_path)?.join(" "),
                };
                spec.class_names = Some(classes);
            }
            "options" => {
                let options = value.as_object().ok_or_else(|| {
                    SpecDocumentError::new(&key_path, "options must be an object")
                })?;
                spec.options = Some(LayoutOptions::from_map(options.clone()));
            }
            "responsive" => {
                let variants = value.as_object().ok_or_else(|| {
                    SpecDocumentError::new(&key_path, "responsive must be an object")
                })?;
                for (breakpoint, variant) in variants {
                    if !is_valid_breakpoint(breakpoint) {
                        return Err(SpecDocumentError::new(
                            &key_path,
                            format!(
                                "invalid breakpoint name '{}'; use letters, digits, '_' and '-'",
                                breakpoint
                            ),
                        ));
                    }
                    let variant_path = format!("{}@{}", path, breakpoint);
                    spec.responsive
                        .insert(breakpoint.clone(), parse_spec(variant, &variant_path)?);
                }
            }
            "conditionals" => {
                let entries = value.as_array().ok_or_else(|| {
                    SpecDocumentError::new(&key_path, "conditionals must be an array")
                })?;
                for (i, entry) in entries.iter().enumerate() {
                    let entry_path = format!("{}[{}]", key_path, i);
                    spec.conditionals.push(parse_conditional(entry, &entry_path)?);
                }
            }
            "itemLayout" => {
                let hint = value.as_str().ok_or_else(|| {
                    SpecDocumentError::new(&key_path, "itemLayout must be a string")
                })?;
                spec.item_layout = Some(hint.to_string());
            }
            reserved if is_reserved_key(reserved) => {
                spec.passthrough.insert(key.clone(), value.clone());
            }
            _ if value.is_object() => {
                spec.properties.insert(key.clone(), parse_spec(value, &key_path)?);
            }
            _ => {
                spec.passthrough.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(spec)
}

fn parse_conditional(value: &Value, path: &str) -> Result<ConditionalSpec, SpecDocumentError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SpecDocumentError::new(path, "conditional must be a JSON object"))?;

    let keyword = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SpecDocumentError::new(path, "conditional requires a string 'type'"))?;
    let kind = ConditionalKind::from_keyword(keyword).ok_or_else(|| {
        SpecDocumentError::new(path, format!("unknown conditional type '{}'", keyword))
    })?;

    let specs = if kind.is_single() {
        match obj.get("spec") {
            Some(spec) => vec![parse_spec(spec, &format!("{}.spec", path))?],
            None => Vec::new(),
        }
    } else {
        match obj.get("specs") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| parse_spec(entry, &format!("{}.specs[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(SpecDocumentError::new(path, "specs must be an array"));
            }
            None => Vec::new(),
        }
    };

    Ok(ConditionalSpec { kind, specs })
}

fn parse_string_list(value: &Value, path: &str) -> Result<Vec<String>, SpecDocumentError> {
    let entries = value
        .as_array()
        .ok_or_else(|| SpecDocumentError::new(path, "expected an array of strings"))?;
    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| SpecDocumentError::new(path, "expected an array of strings"))
        })
        .collect()
}
