//! Schema loading errors
//!
//! Error codes:
//! - SF_SCHEMA_UNREADABLE
//! - SF_SCHEMA_MALFORMED
//! - SF_SCHEMA_UNRESOLVED_REF
//! - SF_SCHEMA_REF_CYCLE
//!
//! All of them are input errors: they fail the one request that hit them.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// File missing or not readable
    SfSchemaUnreadable,
    /// Not JSON, or not a JSON object where a schema is expected
    SfSchemaMalformed,
    /// `$ref` target not found or not local
    SfSchemaUnresolvedRef,
    /// `$ref` chain loops back on itself
    SfSchemaRefCycle,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SfSchemaUnreadable => "SF_SCHEMA_UNREADABLE",
            SchemaErrorCode::SfSchemaMalformed => "SF_SCHEMA_MALFORMED",
            SchemaErrorCode::SfSchemaUnresolvedRef => "SF_SCHEMA_UNRESOLVED_REF",
            SchemaErrorCode::SfSchemaRefCycle => "SF_SCHEMA_REF_CYCLE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the location it was raised at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Node id inside the schema tree, if known
    node: Option<String>,
}

impl SchemaError {
    /// Create an unreadable-file error
    pub fn unreadable(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            code: SchemaErrorCode::SfSchemaUnreadable,
            message: format!("Cannot read schema '{}': {}", path.into(), reason),
            node: None,
        }
    }

    /// Create an error for text that is not valid JSON
    pub fn invalid_json(source: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            code: SchemaErrorCode::SfSchemaMalformed,
            message: format!("Schema '{}' is not valid JSON: {}", source.into(), reason),
            node: None,
        }
    }

    /// Create an error for a value that cannot be a schema
    pub fn malformed(node: impl Into<String>, reason: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            code: SchemaErrorCode::SfSchemaMalformed,
            message: format!("Malformed schema at '{}': {}", node, reason.into()),
            node: Some(node),
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved_ref(node: impl Into<String>, reference: &str) -> Self {
        let node = node.into();
        Self {
            code: SchemaErrorCode::SfSchemaUnresolvedRef,
            message: format!("Cannot resolve $ref '{}' at '{}'", reference, node),
            node: Some(node),
        }
    }

    /// Create a reference cycle error
    pub fn ref_cycle(node: impl Into<String>, reference: &str) -> Self {
        let node = node.into();
        Self {
            code: SchemaErrorCode::SfSchemaRefCycle,
            message: format!("$ref '{}' at '{}' refers back to itself", reference, node),
            node: Some(node),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
