//! Generation errors
//!
//! Three families, each reported differently by the callers:
//! - specification: the layout specification broke a nesting rule (violations attached)
//! - input: the schema, the specification document or the templates could not be read
//! - unexpected: anything else, including a panic during traversal

use std::fmt;

use thiserror::Error;

use crate::layout::{LayoutError, SpecDocumentError, Violation};
use crate::render::RenderError;
use crate::schema::SchemaError;

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Unreadable or malformed input
#[derive(Debug, Clone, Error)]
pub enum InputError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    SpecDocument(#[from] SpecDocumentError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl InputError {
    pub fn code(&self) -> &'static str {
        match self {
            InputError::Schema(e) => e.code().code(),
            InputError::SpecDocument(_) => SpecDocumentError::CODE,
            InputError::Render(e) => e.code().code(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Specification(#[from] LayoutError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("SF_UNEXPECTED: {0}")]
    Unexpected(String),
}

/// Which family an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Specification,
    Input,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Specification => "specification",
            ErrorKind::Input => "input",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl GenerationError {
    pub const UNEXPECTED_CODE: &'static str = "SF_UNEXPECTED";

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Specification(_) => ErrorKind::Specification,
            GenerationError::Input(_) => ErrorKind::Input,
            GenerationError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::Specification(e) => e.code(),
            GenerationError::Input(e) => e.code(),
            GenerationError::Unexpected(_) => Self::UNEXPECTED_CODE,
        }
    }

    /// Violations, for specification errors; empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            GenerationError::Specification(e) => e.violations(),
            _ => &[],
        }
    }

    /// Message without the code prefix
    pub fn message(&self) -> String {
        match self {
            GenerationError::Specification(e) => e.message(),
            GenerationError::Input(InputError::Schema(e)) => e.message().to_string(),
            GenerationError::Input(InputError::SpecDocument(e)) => {
                format!("at '{}': {}", e.path(), e.message())
            }
            GenerationError::Input(InputError::Render(e)) => e.message().to_string(),
            GenerationError::Unexpected(message) => message.clone(),
        }
    }
}

impl From<SchemaError> for GenerationError {
    fn from(e: SchemaError) -> Self {
        GenerationError::Input(InputError::Schema(e))
    }
}

impl From<SpecDocumentError> for GenerationError {
    fn from(e: SpecDocumentError) -> Self {
        GenerationError::Input(InputError::SpecDocument(e))
    }
}

impl From<RenderError> for GenerationError {
    fn from(e: RenderError) -> Self {
        GenerationError::Input(InputError::Render(e))
    }
}
