//! CLI-specific error types
//!
//! Errors raised by the library keep their own codes; the CLI only adds
//! codes for what it does itself.

use std::fmt;
use std::io;

use serde_json::Value;

use crate::batch::BatchError;
use crate::pipeline::GenerationError;
use crate::render::RenderError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// `validate` found violations
    SpecInvalid,
    /// `batch` finished with failed files
    BatchIncomplete,
    /// The playground server could not start or stopped with an error
    ServeFailed,
    /// Code of a library error, passed through unchanged
    Propagated(&'static str),
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SF_CLI_CONFIG_ERROR",
            Self::IoError => "SF_CLI_IO_ERROR",
            Self::SpecInvalid => "SF_CLI_SPEC_INVALID",
            Self::BatchIncomplete => "SF_CLI_BATCH_INCOMPLETE",
            Self::ServeFailed => "SF_CLI_SERVE_FAILED",
            Self::Propagated(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    details: Option<Value>,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn spec_invalid(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SpecInvalid, msg)
    }

    pub fn batch_incomplete(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BatchIncomplete, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// Attaches structured data (violations, a batch summary) to the error response.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<GenerationError> for CliError {
    fn from(e: GenerationError) -> Self {
        let err = Self::new(CliErrorCode::Propagated(e.code()), e.message());
        if e.violations().is_empty() {
            err
        } else {
            let violations = serde_json::to_value(e.violations()).unwrap_or(Value::Null);
            err.with_details(serde_json::json!({ "violations": violations }))
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::Propagated(e.code()), e.to_string())
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        Self::new(CliErrorCode::Propagated(e.code()), e.to_string())
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        Self::new(CliErrorCode::Propagated(e.code().code()), e.message())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutError, Violation, ViolationRule};

    #[test]
    fn test_display_has_code_prefix() {
        let err = CliError::config_error("batch_size must be > 0");
        assert_eq!(err.to_string(), "SF_CLI_CONFIG_ERROR: batch_size must be > 0");
    }

    #[test]
    fn test_generation_error_keeps_code_and_violations() {
        let violation = Violation::new(ViolationRule::TabsInTabs, "$root.a", "tabs cannot nest in tabs; use vtabs");
        let layout = LayoutError::from_violations(vec![violation]).unwrap();
        let err = CliError::from(GenerationError::Specification(layout));

        assert_eq!(err.code_str(), "SF_LAYOUT_SPEC_INVALID");
        let details = err.details().unwrap();
        assert_eq!(details["violations"][0]["rule"], "SF_LAYOUT_TABS_IN_TABS");
    }

    #[test]
    fn test_store_error_code_passes_through() {
        let err = CliError::from(StoreError::NotFound("signup".into()));
        assert_eq!(err.code_str(), "SF_STORE_NOT_FOUND");
    }
}
