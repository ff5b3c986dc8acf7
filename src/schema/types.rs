//! Schema tree types
//!
//! A `SchemaNode` is one node of a parsed JSON Schema: an object with ordered
//! properties, an array with an items node, or a leaf. Conditional keywords
//! (`if`/`then`/`else`, `allOf`/`anyOf`/`oneOf`) hang off the node they were
//! declared on and are nested one level deeper.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::ordered::OrderedMap;
use crate::layout::{LayoutName, LayoutOptions, LayoutType};

/// The declared JSON Schema `type` of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
    /// No `type` and nothing to infer one from
    Any,
    /// Any other type name, kept verbatim
    Other(String),
}

impl SchemaType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            "string" => SchemaType::String,
            "number" => SchemaType::Number,
            "integer" => SchemaType::Integer,
            "boolean" => SchemaType::Boolean,
            "null" => SchemaType::Null,
            "any" => SchemaType::Any,
            other => SchemaType::Other(other.to_string()),
        }
    }

    /// Returns the type name as it appears in the schema
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Any => "any",
            SchemaType::Other(name) => name,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for SchemaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Conditional keywords, in the vocabulary of JSON Schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    If,
    Then,
    Else,
    AllOf,
    AnyOf,
    OneOf,
}

impl ConditionalKind {
    pub const ALL: [ConditionalKind; 6] = [
        ConditionalKind::If,
        ConditionalKind::Then,
        ConditionalKind::Else,
        ConditionalKind::AllOf,
        ConditionalKind::AnyOf,
        ConditionalKind::OneOf,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            ConditionalKind::If => "if",
            ConditionalKind::Then => "then",
            ConditionalKind::Else => "else",
            ConditionalKind::AllOf => "allOf",
            ConditionalKind::AnyOf => "anyOf",
            ConditionalKind::OneOf => "oneOf",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    /// `if`/`then`/`else` carry exactly one sub-schema.
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            ConditionalKind::If | ConditionalKind::Then | ConditionalKind::Else
        )
    }
}

impl fmt::Display for ConditionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl Serialize for ConditionalKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

/// A conditional directive and its sub-schemas.
///
/// Single kinds hold exactly one branch; `allOf`/`anyOf`/`oneOf` hold one
/// branch per array entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditional {
    #[serde(rename = "type")]
    pub kind: ConditionalKind,
    pub branches: Vec<SchemaNode>,
}

impl Conditional {
    pub fn single(kind: ConditionalKind, schema: SchemaNode) -> Self {
        Self {
            kind,
            branches: vec![schema],
        }
    }

    pub fn multi(kind: ConditionalKind, schemas: Vec<SchemaNode>) -> Self {
        Self {
            kind,
            branches: schemas,
        }
    }
}

/// One node of the schema tree.
///
/// `layout`, `layout_options`, `class_names`, `responsive` and `item_hint`
/// are written by the layout applier; everything else comes from the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    pub id: String,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub properties: OrderedMap<SchemaNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditionals: Vec<Conditional>,
    #[serde(rename = "x-layout", skip_serializing_if = "Option::is_none")]
    pub x_layout: Option<LayoutName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<LayoutOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_names: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive: BTreeMap<String, LayoutType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_hint: Option<String>,
}

impl SchemaNode {
    /// Create a node of the given type with no metadata
    pub fn new(id: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            id: id.into(),
            schema_type,
            title: None,
            description: None,
            properties: OrderedMap::new(),
            items: None,
            required: BTreeSet::new(),
            conditionals: Vec::new(),
            x_layout: None,
            layout: None,
            layout_options: None,
            format: None,
            enum_values: Vec::new(),
            default: None,
            read_only: false,
            class_names: None,
            responsive: BTreeMap::new(),
            item_hint: None,
        }
    }

    /// Create an empty object node
    pub fn object(id: impl Into<String>) -> Self {
        Self::new(id, SchemaType::Object)
    }

    /// Create a string leaf
    pub fn string(id: impl Into<String>) -> Self {
        Self::new(id, SchemaType::String)
    }

    /// Create an array node with the given items node
    pub fn array(id: impl Into<String>, items: SchemaNode) -> Self {
        let mut node = Self::new(id, SchemaType::Array);
        node.items = Some(Box::new(items));
        node
    }

    pub fn with_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.insert(name, node);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.insert(name.into());
        self
    }

    pub fn with_x_layout(mut self, layout: impl Into<LayoutName>) -> Self {
        self.x_layout = Some(layout.into());
        self
    }

    pub fn with_conditional(mut self, conditional: Conditional) -> Self {
        self.conditionals.push(conditional);
        self
    }

    pub fn is_object(&self) -> bool {
        self.schema_type == SchemaType::Object
    }

    pub fn is_array(&self) -> bool {
        self.schema_type == SchemaType::Array
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Whether at least one direct property is itself an object
    pub fn has_object_property(&self) -> bool {
        self.properties.values().any(SchemaNode::is_object)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// The layout to render with; nodes the applier never reached stack vertically.
    pub fn effective_layout(&self) -> LayoutType {
        self.layout.unwrap_or(LayoutType::Vertical)
    }

    /// Human label: title, else the last segment of the id.
    pub fn label(&self) -> &str {
        if let Some(title) = &self.title {
            return title;
        }
        self.id
            .rsplit(['.', '['])
            .next()
            .map(|s| s.trim_end_matches(']'))
            .unwrap_or(&self.id)
    }
}
