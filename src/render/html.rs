//! HTML form rendering
//!
//! Turns an annotated schema tree into static markup. Every object node
//! becomes a `<fieldset>` whose body is arranged by its layout:
//!
//! | layout   | markup                                                          |
//! |----------|-----------------------------------------------------------------|
//! | vertical | `<div class="sf-stack">`                                        |
//! | grid     | `<div class="sf-grid" style="grid-template-columns:...;gap:...">` |
//! | tabs     | tab strip (`role="tablist"`) and one `role="tabpanel"` per field  |
//! | vtabs    | same as tabs, tab strip on the side                             |
//! | wizard   | step list (`showSteps`) and one `<section class="sf-step">` each |
//!
//! Client-side behaviour (switching tabs, stepping) is left to the page.

use std::collections::HashSet;
use std::path::PathBuf;

use serde_json::Value;

use super::errors::RenderResult;
use super::template::PageTemplate;
use crate::layout::{
    LayoutOptions, LayoutSpec, LayoutType, TabPosition, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_GAP,
};
use crate::schema::{SchemaNode, SchemaType};

const DEFAULT_TITLE: &str = "Form";

/// Renderer settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Directory holding `page.html` and optionally `form.css`
    pub templates_dir: Option<PathBuf>,
    /// Embed the applied specification in an HTML comment
    pub debug: bool,
}

/// Renders annotated schema trees into HTML pages.
#[derive(Debug, Clone, Default)]
pub struct FormRenderer {
    template: PageTemplate,
    debug: bool,
}

impl FormRenderer {
    /// Loads the configured templates, or uses the built-in page.
    pub fn new(config: &RenderConfig) -> RenderResult<Self> {
        let template = match &config.templates_dir {
            Some(dir) => PageTemplate::load(dir)?,
            None => PageTemplate::builtin(),
        };
        Ok(Self {
            template,
            debug: config.debug,
        })
    }

    pub fn with_template(template: PageTemplate, debug: bool) -> Self {
        Self { template, debug }
    }

    /// Full page for `tree`. `spec` is only used for the debug comment.
    pub fn render_page(&self, tree: &SchemaNode, spec: Option<&LayoutSpec>) -> String {
        let title = escape_html(tree.title.as_deref().unwrap_or(DEFAULT_TITLE));
        let description = escape_html(tree.description.as_deref().unwrap_or(""));

        let mut form = self.render_form(tree);
        if self.debug {
            if let Some(spec) = spec {
                form.push_str(&debug_comment(spec));
            }
        }

        self.template.fill(&[
            ("title", title.as_str()),
            ("description", description.as_str()),
            ("form", form.as_str()),
        ])
    }

    /// The `<form>` element alone.
    pub fn render_form(&self, tree: &SchemaNode) -> String {
        let mut html = String::from("<form class=\"sf-form\" method=\"post\" novalidate>");
        let mut ids = DomIds::default();
        let id = ids.claim(&tree.id);
        html.push_str(&render_node(tree, &id, "", false, false, &mut ids));
        html.push_str("<button type=\"submit\" class=\"sf-submit\">Submit</button></form>");
        html
    }
}

fn render_node(
    node: &SchemaNode,
    id: &str,
    name: &str,
    required: bool,
    legend: bool,
    ids: &mut DomIds,
) -> String {
    match node.schema_type {
        SchemaType::Object => render_object(node, id, name, legend, ids),
        SchemaType::Array => render_array(node, id, name, required, ids),
        _ => render_leaf(node, id, name, required),
    }
}

fn render_object(node: &SchemaNode, id: &str, name: &str, legend: bool, ids: &mut DomIds) -> String {
    let layout = node.effective_layout();
    let mut html = format!(
        "<fieldset id=\"{}\" class=\"{}\" data-layout=\"{}\"{}>",
        id,
        class_list("sf-object", node.class_names.as_deref()),
        layout,
        responsive_attrs(node)
    );

    if legend {
        html.push_str(&format!("<legend>{}</legend>", escape_html(node.label())));
    }
    if let Some(description) = &node.description {
        html.push_str(&format!(
            "<p class=\"sf-help\">{}</p>",
            escape_html(description)
        ));
    }

    let mut children: Vec<Child> = Vec::with_capacity(node.properties.len());
    for (prop, child) in node.properties.iter() {
        let child_id = ids.claim(&child.id);
        let child_html = render_node(
            child,
            &child_id,
            &field_name(name, prop),
            node.is_required(prop),
            true,
            ids,
        );
        children.push(Child {
            id: child_id,
            label: child.title.clone().unwrap_or_else(|| prop.to_string()),
            html: child_html,
        });
    }

    let options = node.layout_options.clone().unwrap_or_default();
    html.push_str(&match layout {
        LayoutType::Vertical => render_stack(&children),
        LayoutType::Grid => render_grid(&children, &options),
        LayoutType::Tabs => render_tabs(&children, &options, "sf-tabs", TabPosition::Top),
        LayoutType::Vtabs => render_tabs(&children, &options, "sf-vtabs", TabPosition::Left),
        LayoutType::Wizard => render_wizard(&children, &options),
    });

    for conditional in &node.conditionals {
        for (i, branch) in conditional.branches.iter().enumerate() {
            if !branch.is_object() || branch.properties.is_empty() {
                continue;
            }
            html.push_str(&format!(
                "<div class=\"sf-conditional\" data-condition=\"{}\" data-branch=\"{}\">",
                conditional.kind, i
            ));
            let branch_id = ids.claim(&branch.id);
            html.push_str(&render_object(branch, &branch_id, name, false, ids));
            html.push_str("</div>");
        }
    }

    html.push_str("</fieldset>");
    html
}

struct Child {
    id: String,
    label: String,
    html: String,
}

fn render_stack(children: &[Child]) -> String {
    let mut html = String::from("<div class=\"sf-stack\">");
    for child in children {
        html.push_str(&child.html);
    }
    html.push_str("</div>");
    html
}

fn render_grid(children: &[Child], options: &LayoutOptions) -> String {
    let columns = options.columns().unwrap_or(DEFAULT_GRID_COLUMNS);
    let gap = options.gap().unwrap_or(DEFAULT_GRID_GAP);

    let mut html = format!(
        "<div class=\"sf-grid\" style=\"grid-template-columns:repeat({},1fr);gap:{}\">",
        columns,
        escape_html(gap)
    );
    for child in children {
        html.push_str(&child.html);
    }
    html.push_str("</div>");
    html
}

fn render_tabs(
    children: &[Child],
    options: &LayoutOptions,
    class: &str,
    default_position: TabPosition,
) -> String {
    let position = options.tab_position().unwrap_or(default_position);

    let mut html = format!(
        "<div class=\"{}\" data-tab-position=\"{}\"><div role=\"tablist\">",
        class,
        position.as_str()
    );
    for (i, child) in children.iter().enumerate() {
        html.push_str(&format!(
            "<button type=\"button\" role=\"tab\" id=\"{id}-tab\" aria-controls=\"{id}-panel\" aria-selected=\"{}\">{}</button>",
            i == 0,
            escape_html(&child.label),
            id = child.id
        ));
    }
    html.push_str("</div>");
    for (i, child) in children.iter().enumerate() {
        html.push_str(&format!(
            "<section role=\"tabpanel\" id=\"{id}-panel\" aria-labelledby=\"{id}-tab\"{}>",
            if i == 0 { "" } else { " hidden" },
            id = child.id
        ));
        html.push_str(&child.html);
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}

fn render_wizard(children: &[Child], options: &LayoutOptions) -> String {
    let show_steps = options.show_steps().unwrap_or(true);
    let allow_jump = options.allow_jump().unwrap_or(true);

    let mut html = format!("<div class=\"sf-wizard\" data-allow-jump=\"{}\">", allow_jump);
    if show_steps {
        html.push_str("<ol class=\"sf-steps\">");
        for (i, child) in children.iter().enumerate() {
            html.push_str(&format!(
                "<li data-step=\"{}\"{}>{}</li>",
                i + 1,
                if i == 0 { " aria-current=\"step\"" } else { "" },
                escape_html(&child.label)
            ));
        }
        html.push_str("</ol>");
    }
    for (i, child) in children.iter().enumerate() {
        html.push_str(&format!(
            "<section class=\"sf-step\" data-step=\"{}\"{}>",
            i + 1,
            if i == 0 { "" } else { " hidden" }
        ));
        html.push_str(&child.html);
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}

fn render_array(node: &SchemaNode, id: &str, name: &str, required: bool, ids: &mut DomIds) -> String {
    let item_type = node
        .items
        .as_ref()
        .map(|items| {
            items
                .item_hint
                .clone()
                .unwrap_or_else(|| items.schema_type.as_str().to_string())
        })
        .unwrap_or_else(|| SchemaType::Any.as_str().to_string());

    let mut html = format!(
        "<div id=\"{}\" class=\"{}\" data-name=\"{}\" data-item-type=\"{}\"{}>",
        id,
        class_list("sf-field sf-array", node.class_names.as_deref()),
        escape_html(name),
        escape_html(&item_type),
        if required { " data-required=\"true\"" } else { "" }
    );
    html.push_str(&format!(
        "<span class=\"sf-label\">{}</span>",
        escape_html(node.label())
    ));
    html.push_str("<div class=\"sf-items\"></div>");
    if let Some(items) = &node.items {
        html.push_str("<template>");
        let items_id = ids.claim(&items.id);
        html.push_str(&render_node(items, &items_id, &format!("{}[]", name), false, false, ids));
        html.push_str("</template>");
    }
    html.push_str("<button type=\"button\" class=\"sf-add\">Add</button></div>");
    html
}

fn render_leaf(node: &SchemaNode, id: &str, name: &str, required: bool) -> String {
    let mut attrs = format!(" id=\"{}\" name=\"{}\"", id, escape_html(name));
    if required {
        attrs.push_str(" required");
    }

    let control = if !node.enum_values.is_empty() {
        if node.read_only {
            attrs.push_str(" disabled");
        }
        render_select(node, &attrs)
    } else {
        if node.read_only {
            attrs.push_str(" readonly");
        }
        render_input(node, &attrs)
    };

    let mut html = format!(
        "<div class=\"{}\"><label for=\"{}\">{}</label>{}",
        class_list("sf-field", node.class_names.as_deref()),
        id,
        escape_html(node.label()),
        control
    );
    if let Some(description) = &node.description {
        html.push_str(&format!(
            "<small class=\"sf-help\">{}</small>",
            escape_html(description)
        ));
    }
    html.push_str("</div>");
    html
}

fn render_select(node: &SchemaNode, attrs: &str) -> String {
    let selected = node.default.as_ref().map(value_to_string);
    let mut html = format!("<select{}>", attrs);
    for option in &node.enum_values {
        let value = value_to_string(option);
        html.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(&value),
            if selected.as_deref() == Some(value.as_str()) {
                " selected"
            } else {
                ""
            }
        ));
    }
    html.push_str("</select>");
    html
}

fn render_input(node: &SchemaNode, attrs: &str) -> String {
    match node.schema_type {
        SchemaType::Boolean => {
            let checked = node.default.as_ref().and_then(Value::as_bool) == Some(true);
            format!(
                "<input type=\"checkbox\"{}{} />",
                attrs,
                if checked { " checked" } else { "" }
            )
        }
        SchemaType::Number | SchemaType::Integer => {
            let step = if node.schema_type == SchemaType::Integer {
                " step=\"1\""
            } else {
                " step=\"any\""
            };
            format!(
                "<input type=\"number\"{}{}{} />",
                attrs,
                step,
                value_attr(node)
            )
        }
        _ => format!(
            "<input type=\"{}\"{}{} />",
            input_type(node.format.as_deref()),
            attrs,
            value_attr(node)
        ),
    }
}

fn input_type(format: Option<&str>) -> &'static str {
    match format {
        Some("email") => "email",
        Some("date") => "date",
        Some("date-time") => "datetime-local",
        Some("time") => "time",
        Some("uri") | Some("url") => "url",
        Some("password") => "password",
        _ => "text",
    }
}

fn value_attr(node: &SchemaNode) -> String {
    node.default
        .as_ref()
        .map(value_to_string)
        .filter(|v| !v.is_empty())
        .map(|v| format!(" value=\"{}\"", escape_html(&v)))
        .unwrap_or_default()
}

fn responsive_attrs(node: &SchemaNode) -> String {
    node.responsive
        .iter()
        .map(|(breakpoint, layout)| {
            format!(" data-layout-{}=\"{}\"", attr_token(breakpoint), layout)
        })
        .collect()
}

fn class_list(base: &str, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|c| !c.is_empty()) {
        Some(extra) => format!("{} {}", base, escape_html(extra)),
        None => base.to_string(),
    }
}

fn field_name(parent: &str, prop: &str) -> String {
    if parent.is_empty() {
        prop.to_string()
    } else {
        format!("{}.{}", parent, prop)
    }
}

/// DOM id derived from a node id: `root.address[]` -> `sf-root-address--`
fn dom_id(node_id: &str) -> String {
    format!("sf-{}", attr_token(node_id))
}

/// Characters outside `[A-Za-z0-9_-]` become `-`.
fn attr_token(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// DOM ids issued while rendering one form. Distinct nodes whose names
/// map to the same id get a numeric suffix.
#[derive(Debug, Default)]
struct DomIds {
    issued: HashSet<String>,
}

impl DomIds {
    fn claim(&mut self, node_id: &str) -> String {
        let base = dom_id(node_id);
        let mut id = base.clone();
        let mut n = 2;
        while self.issued.contains(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        self.issued.insert(id.clone());
        id
    }
}

fn debug_comment(spec: &LayoutSpec) -> String {
    let json = serde_json::to_string_pretty(&spec.to_value()).unwrap_or_default();
    // "--" may not appear inside a comment.
    format!("\n<!-- layout specification\n{}\n-->", json.replace("--", "- -"))
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => v.to_string(),
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
