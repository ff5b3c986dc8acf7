//! Option defaults per layout type
//!
//! Declared values always win; defaults only fill gaps.

use super::types::{option_keys, LayoutOptions, LayoutType, TabPosition};

pub const DEFAULT_GRID_COLUMNS: u32 = 2;
pub const DEFAULT_GRID_GAP: &str = "1rem";

/// Returns a fully defaulted options record for `layout`.
pub fn resolve_options(layout: LayoutType, declared: Option<&LayoutOptions>) -> LayoutOptions {
    let mut options = declared.cloned().unwrap_or_default();

    match layout {
        LayoutType::Grid => {
            options.insert_default(option_keys::COLUMNS, DEFAULT_GRID_COLUMNS);
            options.insert_default(option_keys::GAP, DEFAULT_GRID_GAP);
        }
        LayoutType::Tabs => {
            options.insert_default(option_keys::TAB_POSITION, TabPosition::Top.as_str());
        }
        LayoutType::Vtabs => {
            options.insert_default(option_keys::TAB_POSITION, TabPosition::Left.as_str());
        }
        LayoutType::Wizard => {
            options.insert_default(option_keys::SHOW_STEPS, true);
            options.insert_default(option_keys::ALLOW_JUMP, true);
        }
        LayoutType::Vertical => {}
    }

    options
}
