//! Generation request and output

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::layout::LayoutSpec;
use crate::schema::{SchemaLoader, SchemaNode, SchemaResult};

/// Where the schema comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    File(PathBuf),
    Inline(Value),
}

impl SchemaSource {
    pub fn load(&self) -> SchemaResult<SchemaNode> {
        match self {
            SchemaSource::File(path) => SchemaLoader::from_file(path),
            SchemaSource::Inline(document) => SchemaLoader::from_value(document),
        }
    }

    /// Short description for log lines
    pub fn label(&self) -> String {
        match self {
            SchemaSource::File(path) => path.display().to_string(),
            SchemaSource::Inline(_) => "<inline>".to_string(),
        }
    }
}

/// One schema to turn into a form, with an optional hand-written specification.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub schema: SchemaSource,
    /// Used instead of the inferred specification when present
    pub spec: Option<LayoutSpec>,
}

impl GenerationRequest {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            schema: SchemaSource::File(path.as_ref().to_path_buf()),
            spec: None,
        }
    }

    pub fn inline(document: Value) -> Self {
        Self {
            schema: SchemaSource::Inline(document),
            spec: None,
        }
    }

    pub fn with_spec(mut self, spec: LayoutSpec) -> Self {
        self.spec = Some(spec);
        self
    }
}

/// Everything a successful generation produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// The specification that was applied (inferred or supplied)
    pub spec: LayoutSpec,
    /// The annotated schema tree
    pub tree: SchemaNode,
    /// The rendered page
    pub html: String,
}
