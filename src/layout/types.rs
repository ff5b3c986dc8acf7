//! Layout vocabulary shared by the schema tree and layout specifications
//!
//! - `LayoutType`: the closed set of arrangements a form node can take
//! - `LayoutName`: a declared layout that may not be a valid `LayoutType`
//! - `TabPosition`: placement of the tab strip for tabs/vtabs
//! - `LayoutOptions`: type-dependent option bag, unknown keys preserved

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a node's fields are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// Single vertical stack
    Vertical,
    /// Multi-column grid
    Grid,
    /// Horizontal tabs
    Tabs,
    /// Vertical tabs
    Vtabs,
    /// Multi-step wizard
    Wizard,
}

impl LayoutType {
    /// Every layout type, in declaration order.
    pub const ALL: [LayoutType; 5] = [
        LayoutType::Vertical,
        LayoutType::Grid,
        LayoutType::Tabs,
        LayoutType::Vtabs,
        LayoutType::Wizard,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Vertical => "vertical",
            LayoutType::Grid => "grid",
            LayoutType::Tabs => "tabs",
            LayoutType::Vtabs => "vtabs",
            LayoutType::Wizard => "wizard",
        }
    }

    /// Parses a wire name. Matching is exact.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether this layout may appear at nesting level 3 or deeper.
    pub fn is_flat(&self) -> bool {
        matches!(self, LayoutType::Vertical | LayoutType::Grid)
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown layout type '{}'", s))
    }
}

/// A layout as written in a schema (`x-layout`) or a specification (`layout`).
///
/// Parsing never fails: names outside the closed set are kept so the
/// validator can report them with a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutName {
    Known(LayoutType),
    Unknown(String),
}

impl LayoutName {
    pub fn known(&self) -> Option<LayoutType> {
        match self {
            LayoutName::Known(t) => Some(*t),
            LayoutName::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LayoutName::Known(t) => t.as_str(),
            LayoutName::Unknown(name) => name,
        }
    }

    pub fn is(&self, layout: LayoutType) -> bool {
        self.known() == Some(layout)
    }
}

impl From<LayoutType> for LayoutName {
    fn from(t: LayoutType) -> Self {
        LayoutName::Known(t)
    }
}

impl From<String> for LayoutName {
    fn from(s: String) -> Self {
        match LayoutType::parse(&s) {
            Some(t) => LayoutName::Known(t),
            None => LayoutName::Unknown(s),
        }
    }
}

impl From<&str> for LayoutName {
    fn from(s: &str) -> Self {
        LayoutName::from(s.to_string())
    }
}

impl From<LayoutName> for String {
    fn from(name: LayoutName) -> Self {
        match name {
            LayoutName::Known(t) => t.as_str().to_string(),
            LayoutName::Unknown(s) => s,
        }
    }
}

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Placement of the tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPosition {
    Top,
    Left,
    Right,
    Bottom,
}

impl TabPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabPosition::Top => "top",
            TabPosition::Left => "left",
            TabPosition::Right => "right",
            TabPosition::Bottom => "bottom",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "top" => Some(TabPosition::Top),
            "left" => Some(TabPosition::Left),
            "right" => Some(TabPosition::Right),
            "bottom" => Some(TabPosition::Bottom),
            _ => None,
        }
    }
}

/// Option keys understood by the engine and the renderer.
pub mod option_keys {
    pub const COLUMNS: &str = "columns";
    pub const GAP: &str = "gap";
    pub const TAB_POSITION: &str = "tabPosition";
    pub const SHOW_STEPS: &str = "showSteps";
    pub const ALLOW_JUMP: &str = "allowJump";
}

/// Type-dependent layout options.
///
/// Backed by an ordered JSON map so that values are kept exactly as declared;
/// malformed values are reported by the validator rather than coerced here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutOptions(Map<String, Value>);

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Inserts only when the key is absent. Declared values always win.
    pub fn insert_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.0.contains_key(key) {
            self.0.insert(key.to_string(), value.into());
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Raw `columns` value, whatever its JSON type.
    pub fn columns_raw(&self) -> Option<&Value> {
        self.0.get(option_keys::COLUMNS)
    }

    /// `columns` as a positive count, when numeric.
    pub fn columns(&self) -> Option<u32> {
        let n = self.columns_raw()?.as_f64()?;
        if n >= 1.0 && n <= u32::MAX as f64 {
            Some(n as u32)
        } else {
            None
        }
    }

    pub fn gap(&self) -> Option<&str> {
        self.0.get(option_keys::GAP).and_then(Value::as_str)
    }

    pub fn tab_position_raw(&self) -> Option<&Value> {
        self.0.get(option_keys::TAB_POSITION)
    }

    pub fn tab_position(&self) -> Option<TabPosition> {
        self.tab_position_raw()
            .and_then(Value::as_str)
            .and_then(TabPosition::parse)
    }

    pub fn show_steps(&self) -> Option<bool> {
        self.0.get(option_keys::SHOW_STEPS).and_then(Value::as_bool)
    }

    pub fn allow_jump(&self) -> Option<bool> {
        self.0.get(option_keys::ALLOW_JUMP).and_then(Value::as_bool)
    }
}

impl From<Map<String, Value>> for LayoutOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
