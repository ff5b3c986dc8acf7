//! Page templates with `{{ slot }}` placeholders
//!
//! Slots: `title`, `description`, `styles`, `form`. Unknown slots render as
//! empty strings. Values are inserted verbatim; callers escape text first.

use std::fs;
use std::path::Path;

use super::errors::{RenderError, RenderResult};

pub const PAGE_FILE: &str = "page.html";
pub const STYLES_FILE: &str = "form.css";

const DEFAULT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<style>{{ styles }}</style>
</head>
<body>
<main class="sf-page">
<h1>{{ title }}</h1>
<p class="sf-description">{{ description }}</p>
{{ form }}
</main>
</body>
</html>
"#;

const DEFAULT_STYLES: &str = "\
.sf-page{max-width:64rem;margin:0 auto;font-family:system-ui,sans-serif}\
.sf-stack{display:flex;flex-direction:column;gap:1rem}\
.sf-grid{display:grid}\
.sf-field{display:flex;flex-direction:column;gap:.25rem}\
.sf-tabs [role=tablist]{display:flex;gap:.5rem}\
.sf-vtabs{display:flex}\
.sf-vtabs [role=tablist]{display:flex;flex-direction:column}\
.sf-steps{display:flex;gap:1rem;list-style:decimal inside}\
[role=tabpanel][hidden],.sf-step[hidden]{display:none}";

/// A page template and the stylesheet that goes into its `styles` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    page: String,
    styles: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PageTemplate {
    pub fn builtin() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_STYLES)
    }

    pub fn new(page: impl Into<String>, styles: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            styles: styles.into(),
        }
    }

    /// Loads `page.html` (required) and `form.css` (optional) from `dir`.
    pub fn load(dir: &Path) -> RenderResult<Self> {
        if !dir.is_dir() {
            return Err(RenderError::templates_missing(dir));
        }

        let page_path = dir.join(PAGE_FILE);
        if !page_path.is_file() {
            return Err(RenderError::templates_missing(&page_path));
        }
        let page =
            fs::read_to_string(&page_path).map_err(|e| RenderError::unreadable(&page_path, e))?;

        let styles_path = dir.join(STYLES_FILE);
        let styles = if styles_path.is_file() {
            fs::read_to_string(&styles_path).map_err(|e| RenderError::unreadable(&styles_path, e))?
        } else {
            DEFAULT_STYLES.to_string()
        };

        Ok(Self { page, styles })
    }

    pub fn styles(&self) -> &str {
        &self.styles
    }

    /// Fills every slot from `values`; the `styles` slot falls back to the
    /// template's own stylesheet.
    pub fn fill(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.page.len() + 1024);
        let mut rest = self.page.as_str();

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            out.push_str(&rest[..start]);

            let key = rest[start + 2..start + 2 + len].trim();
            let value = values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .or_else(|| (key == "styles").then_some(self.styles.as_str()))
                .unwrap_or("");
            out.push_str(value);

            rest = &rest[start + 2 + len + 2..];
        }
        out.push_str(rest);

        out
    }
}
