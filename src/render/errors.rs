//! Renderer errors
//!
//! Error codes:
//! - SF_RENDER_TEMPLATES_MISSING: the configured templates directory (or its page.html) does not exist
//! - SF_RENDER_TEMPLATE_UNREADABLE: a template file exists but could not be read

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorCode {
    SfRenderTemplatesMissing,
    SfRenderTemplateUnreadable,
}

impl RenderErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            RenderErrorCode::SfRenderTemplatesMissing => "SF_RENDER_TEMPLATES_MISSING",
            RenderErrorCode::SfRenderTemplateUnreadable => "SF_RENDER_TEMPLATE_UNREADABLE",
        }
    }
}

impl fmt::Display for RenderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    code: RenderErrorCode,
    message: String,
}

impl RenderError {
    pub fn templates_missing(path: &Path) -> Self {
        Self {
            code: RenderErrorCode::SfRenderTemplatesMissing,
            message: format!("templates not found at {}", path.display()),
        }
    }

    pub fn unreadable(path: &Path, reason: impl fmt::Display) -> Self {
        Self {
            code: RenderErrorCode::SfRenderTemplateUnreadable,
            message: format!("cannot read template {}: {}", path.display(), reason),
        }
    }

    pub fn code(&self) -> RenderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RenderError {}

pub type RenderResult<T> = Result<T, RenderError>;
