//! Template renderer
//!
//! Consumes the annotated tree produced by the layout engine and emits a
//! complete HTML page. The renderer makes no layout decisions of its own:
//! nodes it is handed without a layout stack vertically.

mod errors;
mod html;
mod template;

pub use errors::{RenderError, RenderErrorCode, RenderResult};
pub use html::{escape_html, FormRenderer, RenderConfig};
pub use template::{PageTemplate, PAGE_FILE, STYLES_FILE};
