//! Schema loader: JSON Schema text into a `SchemaNode` tree
//!
//! - Properties keep declaration order (serde_json `preserve_order`)
//! - Local `$ref`s (`#/...` JSON pointers) are inlined, sibling keywords win
//! - Conditionals are collected in the order their keywords appear
//! - The schema itself is not checked for well-formedness beyond what the
//!   tree needs

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{Conditional, ConditionalKind, SchemaNode, SchemaType};
use crate::layout::{LayoutName, LayoutOptions};

/// Id of the root node; children append `.name`, `[]`, `.if`, `.allOf[i]`.
pub const ROOT_ID: &str = "root";

/// Nesting deeper than this is treated as malformed.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Builds schema trees from JSON Schema documents.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Reads and parses a schema file.
    pub fn from_file(path: &Path) -> SchemaResult<SchemaNode> {
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::unreadable(path.display().to_string(), e))?;
        Self::parse_named(&content, &path.display().to_string())
    }

    /// Parses schema text.
    pub fn from_text(content: &str) -> SchemaResult<SchemaNode> {
        Self::parse_named(content, "<inline>")
    }

    /// Builds a tree from an already-parsed document.
    pub fn from_value(document: &Value) -> SchemaResult<SchemaNode> {
        let mut builder = TreeBuilder {
            root: document,
            ref_stack: Vec::new(),
        };
        builder.build(document, ROOT_ID.to_string(), 0)
    }

    fn parse_named(content: &str, source: &str) -> SchemaResult<SchemaNode> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| SchemaError::invalid_json(source, e))?;
        if !document.is_object() {
            return Err(SchemaError::malformed(ROOT_ID, "schema document must be a JSON object"));
        }
        Self::from_value(&document)
    }
}

struct TreeBuilder<'a> {
    root: &'a Value,
    /// `$ref`s currently being expanded, for cycle detection
    ref_stack: Vec<String>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, value: &Value, id: String, depth: usize) -> SchemaResult<SchemaNode> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(SchemaError::malformed(
                id,
                format!("nesting exceeds {} levels", MAX_SCHEMA_DEPTH),
            ));
        }

        let obj = match value {
            Value::Object(obj) => obj,
            // Boolean schemas accept anything (true) or nothing (false); neither has structure.
            Value::Bool(_) => return Ok(SchemaNode::new(id, SchemaType::Any)),
            other => {
                return Err(SchemaError::malformed(
                    id,
                    format!("expected a schema object, found {}", json_type_name(other)),
                ))
            }
        };

        if let Some(reference) = obj.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| SchemaError::malformed(id.clone(), "$ref must be a string"))?;
            return self.build_ref(obj, reference, id, depth);
        }

        self.build_object(obj, id, depth)
    }

    fn build_ref(
        &mut self,
        obj: &Map<String, Value>,
        reference: &str,
        id: String,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        if self.ref_stack.iter().any(|r| r == reference) {
            return Err(SchemaError::ref_cycle(id, reference));
        }

        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| SchemaError::unresolved_ref(id.clone(), reference))?;
        let target = self
            .root
            .pointer(pointer)
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaError::unresolved_ref(id.clone(), reference))?;

        let mut merged = target.clone();
        for (key, value) in obj {
            if key != "$ref" {
                merged.insert(key.clone(), value.clone());
            }
        }

        self.ref_stack.push(reference.to_string());
        let result = self.build(&Value::Object(merged), id, depth);
        self.ref_stack.pop();
        result
    }

    fn build_object(
        &mut self,
        obj: &Map<String, Value>,
        id: String,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        let mut node = SchemaNode::new(id.clone(), declared_type(obj));

        node.title = string_field(obj, "title");
        node.description = string_field(obj, "description");
        node.format = string_field(obj, "format");
        node.default = obj.get("default").cloned();
        node.read_only = obj.get("readOnly").and_then(Value::as_bool).unwrap_or(false);
        node.x_layout = string_field(obj, "x-layout").map(LayoutName::from);

        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            node.enum_values = values.clone();
        }

        if let Some(options) = obj.get("layoutOptions") {
            let options = options.as_object().ok_or_else(|| {
                SchemaError::malformed(id.clone(), "layoutOptions must be an object")
            })?;
            node.layout_options = Some(LayoutOptions::from_map(options.clone()));
        }

        if let Some(required) = obj.get("required").and_then(Value::as_array) {
            node.required = required
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }

        if let Some(properties) = obj.get("properties") {
            let properties = properties.as_object().ok_or_else(|| {
                SchemaError::malformed(id.clone(), "properties must be an object")
            })?;
            for (name, sub) in properties {
                let child = self.build(sub, format!("{}.{}", id, name), depth + 1)?;
                node.properties.insert(name.clone(), child);
            }
        }

        match obj.get("items") {
            Some(Value::Array(tuple)) => {
                // Tuple validation: the first position stands in for the item template.
                if let Some(first) = tuple.first() {
                    let items = self.build(first, format!("{}[]", id), depth + 1)?;
                    node.items = Some(Box::new(items));
                }
            }
            Some(items) => {
                let items = self.build(items, format!("{}[]", id), depth + 1)?;
                node.items = Some(Box::new(items));
            }
            None => {}
        }

        for (key, value) in obj {
            let Some(kind) = ConditionalKind::from_keyword(key) else {
                continue;
            };
            let conditional = if kind.is_single() {
                let branch = self.build(value, format!("{}.{}", id, key), depth + 1)?;
                Conditional::single(kind, branch)
            } else {
                let entries = value.as_array().ok_or_else(|| {
                    SchemaError::malformed(id.clone(), format!("{} must be an array", key))
                })?;
                let branches = entries
                    .iter()
                    .enumerate()
                    .map(|(i, sub)| self.build(sub, format!("{}.{}[{}]", id, key, i), depth + 1))
                    .collect::<SchemaResult<Vec<_>>>()?;
                Conditional::multi(kind, branches)
            };
            node.conditionals.push(conditional);
        }

        Ok(node)
    }
}

/// Declared type, or one inferred from structure when `type` is absent.
fn declared_type(obj: &Map<String, Value>) -> SchemaType {
    match obj.get("type") {
        Some(Value::String(name)) => SchemaType::from_name(name),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .map(SchemaType::from_name)
            .unwrap_or(SchemaType::Null),
        _ if obj.contains_key("properties") => SchemaType::Object,
        _ if obj.contains_key("items") => SchemaType::Array,
        _ => SchemaType::Any,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
